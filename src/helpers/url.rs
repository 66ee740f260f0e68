//! URL helper functions - every route URL the site knows is built here

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a path; `/` is kept so multi-segment
/// item paths stay multi-segment
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

/// Characters escaped in a single segment, `/` included
const SEGMENT: &AsciiSet = &PATH.add(b'/');

/// Join a path onto the site root
///
/// # Examples
/// ```ignore
/// url_for("/blog/", "archive/") // -> "/blog/archive/"
/// ```
pub fn url_for(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Front page, or one of its later pages
pub fn url_index(root: &str, page: usize) -> String {
    if page <= 1 {
        url_for(root, "")
    } else {
        url_for(root, &format!("{}/", page))
    }
}

/// Archive of everything, or of one tag
pub fn url_archive(root: &str, tag: Option<&str>) -> String {
    match tag {
        None => url_for(root, "archive/"),
        Some(tag) => url_for(
            root,
            &format!("archive/{}/", utf8_percent_encode(tag, SEGMENT)),
        ),
    }
}

pub fn url_page(root: &str, path: &str) -> String {
    url_for(
        root,
        &format!("page/{}/", utf8_percent_encode(path, PATH)),
    )
}

pub fn url_post(root: &str, path: &str) -> String {
    url_for(
        root,
        &format!("post/{}/", utf8_percent_encode(path, PATH)),
    )
}

pub fn url_static(root: &str, file: &str) -> String {
    url_for(
        root,
        &format!("static/{}", utf8_percent_encode(file, PATH)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_index() {
        assert_eq!(url_index("/", 1), "/");
        assert_eq!(url_index("/", 2), "/2/");
        assert_eq!(url_index("/blog/", 1), "/blog/");
        assert_eq!(url_index("/blog/", 3), "/blog/3/");
    }

    #[test]
    fn test_url_archive() {
        assert_eq!(url_archive("/", None), "/archive/");
        assert_eq!(url_archive("/", Some("rust")), "/archive/rust/");
        assert_eq!(url_archive("/", Some("two words")), "/archive/two%20words/");
        assert_eq!(url_archive("/", Some("a/b")), "/archive/a%2Fb/");
    }

    #[test]
    fn test_url_page_and_post_keep_segments() {
        assert_eq!(url_page("/", "about"), "/page/about/");
        assert_eq!(url_post("/", "2020/hello"), "/post/2020/hello/");
        assert_eq!(url_post("/", "hello world"), "/post/hello%20world/");
    }

    #[test]
    fn test_url_static() {
        assert_eq!(url_static("/", "style.css"), "/static/style.css");
        assert_eq!(url_static("/blog/", "style.css"), "/blog/static/style.css");
    }
}
