use std::future::Future;

use crate::route::Route;

/// Moves the surrounding UI to another view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Asks the user a yes/no question.
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: &str) -> impl Future<Output = bool> + Send;
}
