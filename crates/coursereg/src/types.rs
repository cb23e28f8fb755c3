use crate::catalog::CourseCatalog;

/// State shared by every request handler.
pub struct AppState {
    pub catalog: CourseCatalog,
    /// Term whose courses are listed
    pub term: String,
}

impl AppState {
    pub fn new(catalog: CourseCatalog, term: impl Into<String>) -> Self {
        Self {
            catalog,
            term: term.into(),
        }
    }
}
