//! Path-string normalization for the command line.
//!
//! Lets a Windows-style path pasted into a Linux shell (for example under WSL) resolve to the
//! matching `/mnt/<drive>/` mount. Only the binary uses this; the library works on resolved paths.

/// Rewrite a Windows-style path into its Linux mount equivalent.
///
/// Absolute POSIX paths are returned untouched. Backslashes become forward slashes and a leading
/// `X:/` drive prefix becomes `/mnt/x/`.
pub fn windows_to_posix(input: &str) -> String {
    if input.starts_with('/') {
        return input.to_owned();
    }
    let path = input.replace('\\', "/");

    let mut chars = path.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(drive), Some(':'), Some('/')) if drive.is_ascii_alphabetic() => {
            format!("/mnt/{}/{}", drive.to_ascii_lowercase(), &path[3..])
        }
        _ => path,
    }
}

/// Apply [`windows_to_posix`] on non-Windows hosts; identity on Windows.
pub fn normalize_cli_path(input: &str) -> String {
    if cfg!(windows) {
        input.to_owned()
    } else {
        windows_to_posix(input)
    }
}

#[cfg(test)]
#[path = "../tests/unit/host/paths.rs"]
mod tests;
