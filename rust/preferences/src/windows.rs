use windows_registry::CURRENT_USER;
use windows_result::HRESULT;

use super::json::{from_json, to_json};
use super::{Change, Edits, StoreError, Value};

const BASE_PATH: &str = "Software";

struct Store {
    domain: String,
}

impl Store {
    fn registry_path(&self) -> String {
        format!("{BASE_PATH}\\{}", self.domain)
    }
}

// `HRESULT_FROM_WIN32(ERROR_FILE_NOT_FOUND)`
const FILE_NOT_FOUND: HRESULT = HRESULT(0x8007_0002_u32.cast_signed());

fn backend_error(e: &windows_result::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// Removing something that is already gone succeeds; every other failure is reported.
fn removed(result: windows_result::Result<()>) -> Result<(), StoreError> {
    match result {
        Err(e) if e.code() == FILE_NOT_FOUND => Ok(()),
        other => other.map_err(|e| backend_error(&e)),
    }
}

impl super::Store for Store {
    fn get(&self, key: &str) -> Option<Value> {
        let registry_key = CURRENT_USER.open(self.registry_path()).ok()?;
        let s = registry_key.get_string(key).ok()?;
        from_json(key, &s)
    }

    fn commit(&self, edits: Edits) -> Result<(), StoreError> {
        log::debug!(
            "committing {} change(s) to registry domain `{}`",
            edits.changes.len(),
            self.domain
        );
        if edits.clear {
            removed(CURRENT_USER.remove_tree(self.registry_path()))?;
        }
        if edits.changes.is_empty() {
            return Ok(());
        }

        let registry_key = CURRENT_USER
            .create(self.registry_path())
            .map_err(|e| backend_error(&e))?;
        for change in edits.changes {
            match change {
                Change::Put { key, value } => {
                    let s = to_json(&key, &value)?;
                    registry_key
                        .set_string(key.as_str(), s.as_str())
                        .map_err(|e| backend_error(&e))?;
                }
                Change::Remove { key } => {
                    removed(registry_key.remove_value(key.as_str()))?;
                }
            }
        }
        Ok(())
    }
}

pub fn create_os_store(domain: &str) -> impl super::Store + use<> {
    Store {
        domain: domain.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `HRESULT_FROM_WIN32(ERROR_ACCESS_DENIED)`
    const ACCESS_DENIED: HRESULT = HRESULT(0x8007_0005_u32.cast_signed());

    #[test]
    fn removing_missing_entry_succeeds() {
        let result = Err(windows_result::Error::from_hresult(FILE_NOT_FOUND));
        assert_eq!(removed(result), Ok(()));
    }

    #[test]
    fn other_removal_failures_are_reported() {
        let result = Err(windows_result::Error::from_hresult(ACCESS_DENIED));
        assert!(matches!(removed(result), Err(StoreError::Backend(_))));
        assert_eq!(removed(Ok(())), Ok(()));
    }
}
