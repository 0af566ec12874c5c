use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(sync_home: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    let base = sync_home.or(home_dir)?;
    Some(base.join(".issuesync/.env"))
}

/// Load `.env` from the working directory, falling back to the
/// `ISSUESYNC_HOME` (or home) dotfile. Useful for `GH_TOKEN` and the
/// `ISSUESYNC_*` overrides.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let fallback = fallback_dotenv_path(
        env::var_os("ISSUESYNC_HOME").map(PathBuf::from),
        dirs::home_dir(),
    );

    let Some(path) = fallback else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::fallback_dotenv_path;
    use std::path::PathBuf;

    #[test]
    fn fallback_prefers_issuesync_home() {
        let got = fallback_dotenv_path(
            Some(PathBuf::from("/workspace")),
            Some(PathBuf::from("/home/alice")),
        );

        let want = Some(PathBuf::from("/workspace/.issuesync/.env"));
        assert_eq!(got, want);
    }

    #[test]
    fn fallback_uses_home_when_sync_home_unset() {
        let got = fallback_dotenv_path(None, Some(PathBuf::from("/home/alice")));
        let want = Some(PathBuf::from("/home/alice/.issuesync/.env"));
        assert_eq!(got, want);
    }
}
