//! Router double that records every redirect

use parking_lot::Mutex;
use wayfinder_core::Router;
use wayfinder_model::RoutePath;

#[derive(Debug)]
pub struct RecordingRouter {
    current: Mutex<RoutePath>,
    history: Mutex<Vec<RoutePath>>,
}

impl RecordingRouter {
    /// Router sitting on `path`
    pub fn at(path: RoutePath) -> Self {
        Self {
            current: Mutex::new(path),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Move without going through `navigate`, as a user typing a URL would
    pub fn visit(&self, path: RoutePath) {
        *self.current.lock() = path;
    }

    /// Paths passed to `navigate`, oldest first
    pub fn history(&self) -> Vec<RoutePath> {
        self.history.lock().clone()
    }
}

impl Router for RecordingRouter {
    fn current_path(&self) -> RoutePath {
        self.current.lock().clone()
    }

    fn navigate(&self, path: &RoutePath) {
        *self.current.lock() = path.clone();
        self.history.lock().push(path.clone());
    }
}
