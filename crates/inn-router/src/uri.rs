//! Request path derivation for script-style hosting.
//!
//! A script mounted under a directory sees request URIs such as
//! `/blog/index.php/posts/7?page=2` or `/blog/posts/7/`. The router matches
//! paths relative to that directory, so the host adapter strips the mount
//! point, the query string and surrounding slashes before dispatching.

/// Derives the routing path from a raw request URI and the script name.
///
/// The script's directory is removed from the front of the URI when present,
/// the query string is dropped and the result is trimmed of slashes and
/// given exactly one leading `/`. No percent-decoding is done.
///
/// # Example
///
/// ```
/// use inn_router::request_path;
///
/// assert_eq!(request_path("/blog/posts/7/?page=2", "/blog/index.php"), "/posts/7");
/// assert_eq!(request_path("/", "/index.php"), "/");
/// ```
pub fn request_path(request_uri: &str, script_name: &str) -> String {
    let directory = script_directory(script_name);
    let relative = request_uri.strip_prefix(directory).unwrap_or(request_uri);
    let without_query = relative.split_once('?').map_or(relative, |(path, _)| path);
    format!("/{}", without_query.trim_matches('/'))
}

/// Directory part of a script path; `/` for scripts at the root.
fn script_directory(script_name: &str) -> &str {
    match script_name.rfind('/') {
        Some(0) => "/",
        Some(idx) => &script_name[..idx],
        None => "",
    }
}
