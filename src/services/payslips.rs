use std::cmp::Ordering;

use serde_json::json;
use tracing::{error, info};

use crate::client::backend::{Backend, Endpoint, fetch_list};
use crate::error::AppError;
use crate::model::payslip::{PayslipFile, PayslipMetadata};
use crate::model::worker::Worker;
use crate::services::workers;
use crate::utils::content_disposition::filename_from_header;

const PDF: &str = "application/pdf";

fn latest_first(payslips: &mut [PayslipMetadata]) {
    payslips.sort_by(|a, b| match (a.period, b.period) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn pick(payslips: Vec<PayslipMetadata>, id: u64) -> Result<PayslipMetadata, AppError> {
    payslips
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Payslip {id} not found")))
}

/// The signed-in worker's payslips, latest period first, undated last.
pub async fn list(backend: &dyn Backend) -> Result<Vec<PayslipMetadata>, AppError> {
    let mut payslips: Vec<PayslipMetadata> =
        fetch_list(backend, Endpoint::WorkerPayslips, None).await?;
    latest_first(&mut payslips);
    Ok(payslips)
}

/// Payslips of one of the signed-in company's workers, same order as [`list`].
pub async fn list_for_worker(backend: &dyn Backend, worker_id: u64) -> Result<Vec<PayslipMetadata>, AppError> {
    let worker = workers::find(backend, worker_id).await?;
    of_worker(backend, &worker).await
}

async fn of_worker(backend: &dyn Backend, worker: &Worker) -> Result<Vec<PayslipMetadata>, AppError> {
    let mut payslips: Vec<PayslipMetadata> = fetch_list(
        backend,
        Endpoint::PayslipsOfWorker,
        Some(json!({ "id": worker.id })),
    )
    .await?;
    latest_first(&mut payslips);
    Ok(payslips)
}

/// Fetches the PDF of one of the worker's own payslips.
///
/// The name comes from the backend's `Content-Disposition` header, or
/// `nomina-{periodo}.pdf` when the header carries none.
pub async fn download(backend: &dyn Backend, id: u64) -> Result<PayslipFile, AppError> {
    let payslip = pick(list(backend).await?, id)?;
    fetch_file(backend, id, payslip.fallback_filename()).await
}

/// Company download of a worker's payslip; the fallback name carries the
/// worker's name.
pub async fn download_for_worker(
    backend: &dyn Backend,
    worker_id: u64,
    id: u64,
) -> Result<PayslipFile, AppError> {
    let worker = workers::find(backend, worker_id).await?;
    let payslip = pick(of_worker(backend, &worker).await?, id)?;
    fetch_file(backend, id, payslip.fallback_filename_for(&worker)).await
}

async fn fetch_file(backend: &dyn Backend, id: u64, fallback: String) -> Result<PayslipFile, AppError> {
    let raw = backend
        .download(Endpoint::DownloadPayslip, json!({ "id": id }))
        .await
        .map_err(|e| {
            error!(error = %e, id, "Payslip download failed");
            e
        })?;

    let filename = raw
        .content_disposition
        .as_deref()
        .and_then(filename_from_header)
        .unwrap_or(fallback);

    info!(id, filename = %filename, bytes = raw.bytes.len(), "Payslip downloaded");

    Ok(PayslipFile {
        filename,
        content_type: raw.content_type.unwrap_or_else(|| PDF.to_string()),
        bytes: raw.bytes,
    })
}
