use std::collections::HashMap;

/// Memoized uid -> username resolution. The cache only grows; the uid
/// space of a single host is small and stable, so entries are never
/// evicted and each uid costs at most one system lookup per process
/// lifetime.
#[derive(Debug, Default)]
pub struct IdentityCache {
    names: HashMap<u32, String>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached name, or a one-time system lookup falling back to the
    /// decimal uid. Never errors.
    pub fn resolve(&mut self, uid: u32) -> &str {
        self.resolve_with(uid, lookup_username)
    }

    pub fn resolve_with<F>(&mut self, uid: u32, lookup: F) -> &str
    where
        F: FnOnce(u32) -> Option<String>,
    {
        self.names
            .entry(uid)
            .or_insert_with(|| lookup(uid).unwrap_or_else(|| uid.to_string()))
    }
}

#[cfg(target_os = "linux")]
fn lookup_username(uid: u32) -> Option<String> {
    use std::ffi::CStr;

    let mut buf_len = 256;
    loop {
        let mut buf = vec![0 as libc::c_char; buf_len];
        let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::passwd = std::ptr::null_mut();

        // SAFETY: pwd, buf and result outlive the call; getpwuid_r writes
        // the string fields of pwd into buf and sets result to &pwd (or
        // null when the uid is unknown).
        let rc = unsafe {
            libc::getpwuid_r(uid, &mut pwd, buf.as_mut_ptr(), buf.len(), &mut result)
        };
        if rc == libc::ERANGE {
            buf_len *= 2;
            if buf_len > 1 << 16 {
                return None;
            }
            continue;
        }
        if rc != 0 || result.is_null() {
            return None;
        }
        // SAFETY: on success pw_name points at a NUL-terminated string
        // inside buf, which is still alive here.
        let name = unsafe { CStr::from_ptr(pwd.pw_name) };
        return name.to_str().ok().map(str::to_owned);
    }
}

#[cfg(not(target_os = "linux"))]
fn lookup_username(_uid: u32) -> Option<String> {
    None
}
