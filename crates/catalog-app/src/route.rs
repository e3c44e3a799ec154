/// The three logical views of the catalog UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Create,
    Edit(i64),
}

impl Route {
    /// Resolves a path to a view. Anything unrecognized redirects to [`Route::Root`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim().trim_matches('/');
        let mut segments = trimmed.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some("create"), None, None) => Route::Create,
            (Some("edit"), Some(id), None) => match id.parse::<i64>() {
                Ok(id) if id > 0 => Route::Edit(id),
                _ => Route::Root,
            },
            _ => Route::Root,
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_owned(),
            Route::Create => "/create".to_owned(),
            Route::Edit(id) => format!("/edit/{id}"),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
