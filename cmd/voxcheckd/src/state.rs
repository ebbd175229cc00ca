use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use voxcheck_detect::{Analyzer, DetectError, RandomForest};

/// Shared service state.
///
/// The classifier artifact is loaded lazily on first use and cached for
/// the process lifetime; concurrent first loads resolve to a single
/// instance behind the cell. There is no reload path.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    model_path: PathBuf,
    api_key: String,
    model: OnceCell<Arc<RandomForest>>,
}

impl AppState {
    pub fn new(model_path: PathBuf, api_key: String) -> Self {
        Self {
            inner: Arc::new(Inner {
                model_path,
                api_key,
                model: OnceCell::new(),
            }),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.inner.api_key
    }

    /// Returns an analyzer over the cached model, loading the artifact
    /// on first call. [`DetectError::ModelUnavailable`] if the artifact
    /// cannot be loaded; later calls retry until one succeeds.
    pub fn analyzer(&self) -> Result<Analyzer, DetectError> {
        let model = self
            .inner
            .model
            .get_or_try_init(|| RandomForest::load(&self.inner.model_path).map(Arc::new))?
            .clone();
        Ok(Analyzer::new(model))
    }
}
