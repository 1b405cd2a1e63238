use crate::client::backend::{Backend, Endpoint, fetch_list};
use crate::error::AppError;
use crate::model::worker::{Worker, WorkerView};

/// Workers of the signed-in company, in backend order.
pub async fn list(backend: &dyn Backend) -> Result<Vec<WorkerView>, AppError> {
    let workers: Vec<Worker> = fetch_list(backend, Endpoint::CompanyWorkers, None).await?;
    Ok(workers.into_iter().map(WorkerView::from).collect())
}

/// One worker of the signed-in company.
pub async fn find(backend: &dyn Backend, id: u64) -> Result<Worker, AppError> {
    let workers: Vec<Worker> = fetch_list(backend, Endpoint::CompanyWorkers, None).await?;
    workers
        .into_iter()
        .find(|w| w.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Worker {id} not found")))
}
