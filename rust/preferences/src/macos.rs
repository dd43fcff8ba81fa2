use objc::{runtime::Object, sel, sel_impl};
use std::ffi::{CStr, CString, c_char, c_ulong};

use super::json::{from_json, to_json};
use super::{Change, Edits, StoreError, Value};

struct Store {
    domain: String,
}

#[link(name = "AppKit", kind = "framework")]
unsafe extern "C" {}

/// Returns `None` if `s` contains a nul byte.
unsafe fn autoreleased_nsstring(s: &str) -> Option<*mut Object> {
    let cstring = CString::new(s).ok()?;
    let nsstring = objc::class!(NSString);
    let ret: *mut Object =
        unsafe { objc::msg_send![nsstring, stringWithUTF8String: cstring.as_ptr()] };
    Some(ret)
}

unsafe fn with_user_defaults<R, F: FnOnce(*mut Object) -> R>(domain: &str, f: F) -> Option<R> {
    unsafe {
        let domain_string = autoreleased_nsstring(domain)?;
        let user_defaults_class = objc::class!(NSUserDefaults);
        let user_defaults_alloc: *mut Object = objc::msg_send![user_defaults_class, alloc];
        let user_defaults: *mut Object =
            objc::msg_send![user_defaults_alloc, initWithSuiteName: domain_string];
        if user_defaults.is_null() {
            return None;
        }
        let ret = f(user_defaults);
        let _: () = objc::msg_send![user_defaults, release];
        Some(ret)
    }
}

fn unavailable(domain: &str) -> StoreError {
    StoreError::Backend(format!("cannot open user defaults for `{domain}`"))
}

fn invalid_key(key: &str) -> StoreError {
    StoreError::Backend(format!("preference `{key}` contains a nul byte"))
}

impl super::Store for Store {
    fn get(&self, key: &str) -> Option<Value> {
        unsafe {
            with_user_defaults(&self.domain, |user_defaults| {
                let ns_key = autoreleased_nsstring(key)?;
                let value: *mut Object = objc::msg_send![user_defaults, stringForKey: ns_key];
                if value.is_null() {
                    return None;
                }
                let utf8: *const c_char = objc::msg_send![value, UTF8String];
                let s = CStr::from_ptr(utf8).to_str().ok()?;
                from_json(key, s)
            })
            .flatten()
        }
    }

    fn commit(&self, edits: Edits) -> Result<(), StoreError> {
        log::debug!(
            "committing {} change(s) to user defaults `{}`",
            edits.changes.len(),
            self.domain
        );
        let Edits { clear, changes } = edits;

        unsafe {
            // Build every key and value before touching the store, so a bad
            // change leaves it untouched.
            let encoded = changes
                .into_iter()
                .map(|change| -> Result<_, StoreError> {
                    let (key, value) = match change {
                        Change::Put { key, value } => {
                            let s = to_json(&key, &value)?;
                            (key, Some(s))
                        }
                        Change::Remove { key } => (key, None),
                    };
                    let ns_key = autoreleased_nsstring(&key).ok_or_else(|| invalid_key(&key))?;
                    let ns_value = match value {
                        Some(s) => {
                            Some(autoreleased_nsstring(&s).ok_or_else(|| invalid_key(&key))?)
                        }
                        None => None,
                    };
                    Ok((ns_key, ns_value))
                })
                .collect::<Result<Vec<_>, StoreError>>()?;

            with_user_defaults(&self.domain, |user_defaults| {
                if clear {
                    let dictionary: *mut Object =
                        objc::msg_send![user_defaults, dictionaryRepresentation];
                    let count: c_ulong = objc::msg_send![dictionary, count];
                    let keys: *mut Object = objc::msg_send![dictionary, allKeys];

                    for i in 0..count {
                        let key: *mut Object = objc::msg_send![keys, objectAtIndex: i];
                        let _: () = objc::msg_send![user_defaults, removeObjectForKey: key];
                    }
                }

                for (ns_key, ns_value) in encoded {
                    match ns_value {
                        Some(ns_value) => {
                            let _: () =
                                objc::msg_send![user_defaults, setObject: ns_value forKey: ns_key];
                        }
                        None => {
                            let _: () = objc::msg_send![user_defaults, removeObjectForKey: ns_key];
                        }
                    }
                }
            })
            .ok_or_else(|| unavailable(&self.domain))
        }
    }
}

pub fn create_os_store(domain: &str) -> impl super::Store + use<> {
    Store {
        domain: domain.to_string(),
    }
}
