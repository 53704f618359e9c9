//! Host measurements used by threshold probes.
//!
//! Thin wrappers over `libc` on unix and `windows-sys` on Windows.

use crate::error::{Result, RigupError};
use std::path::Path;

/// Bytes in one GiB.
pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Total physical memory in bytes.
#[cfg(unix)]
pub fn total_memory_bytes() -> Result<u64> {
    // SAFETY: sysconf only reads system configuration values
    let (pages, page_size) =
        unsafe { (libc::sysconf(libc::_SC_PHYS_PAGES), libc::sysconf(libc::_SC_PAGESIZE)) };
    if pages <= 0 || page_size <= 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(pages as u64 * page_size as u64)
}

/// Total physical memory in bytes.
#[cfg(windows)]
pub fn total_memory_bytes() -> Result<u64> {
    use windows_sys::Win32::System::SystemInformation::{GlobalMemoryStatusEx, MEMORYSTATUSEX};

    // SAFETY: MEMORYSTATUSEX is plain data; dwLength is set before the call
    let mut status: MEMORYSTATUSEX = unsafe { std::mem::zeroed() };
    status.dwLength = std::mem::size_of::<MEMORYSTATUSEX>() as u32;
    let ok = unsafe { GlobalMemoryStatusEx(&mut status) };
    if ok == 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(status.ullTotalPhys)
}

/// Total physical memory in bytes.
#[cfg(not(any(unix, windows)))]
pub fn total_memory_bytes() -> Result<u64> {
    Err(RigupError::Other(anyhow::anyhow!(
        "memory measurement is not supported on this platform"
    )))
}

/// Free bytes available to the current user on the volume holding `path`.
#[cfg(unix)]
pub fn free_disk_bytes(path: &Path) -> Result<u64> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|e| {
        RigupError::Other(anyhow::anyhow!("invalid path {}: {}", path.display(), e))
    })?;
    // SAFETY: c_path is a valid NUL-terminated string and stat is written by statvfs
    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    #[allow(clippy::unnecessary_cast)]
    Ok(stat.f_bavail as u64 * stat.f_frsize as u64)
}

/// Free bytes available to the current user on the volume holding `path`.
#[cfg(windows)]
pub fn free_disk_bytes(path: &Path) -> Result<u64> {
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::Storage::FileSystem::GetDiskFreeSpaceExW;

    let wide: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();
    let mut available: u64 = 0;
    // SAFETY: wide is NUL-terminated; null out-pointers are permitted by the API
    let ok = unsafe {
        GetDiskFreeSpaceExW(
            wide.as_ptr(),
            &mut available,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        )
    };
    if ok == 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(available)
}

/// Free bytes available to the current user on the volume holding `path`.
#[cfg(not(any(unix, windows)))]
pub fn free_disk_bytes(path: &Path) -> Result<u64> {
    Err(RigupError::Other(anyhow::anyhow!(
        "disk measurement is not supported for {}",
        path.display()
    )))
}

/// Format a byte count as GiB with two decimals.
pub fn format_gib(bytes: u64) -> String {
    format!("{:.2} GiB", bytes as f64 / GIB)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_memory_is_positive() {
        assert!(total_memory_bytes().unwrap() > 0);
    }

    #[test]
    fn free_disk_of_temp_dir_is_measurable() {
        let dir = std::env::temp_dir();
        assert!(free_disk_bytes(&dir).is_ok());
    }

    #[test]
    fn free_disk_of_missing_path_errors() {
        let missing = std::env::temp_dir().join("rigup-definitely-missing-dir/x/y");
        assert!(free_disk_bytes(&missing).is_err());
    }

    #[test]
    fn format_gib_rounds() {
        assert_eq!(format_gib(16 * 1024 * 1024 * 1024), "16.00 GiB");
        assert_eq!(format_gib(1024 * 1024 * 512), "0.50 GiB");
    }
}
