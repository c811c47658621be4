//! HTML pages for the gateway.
//!
//! Every piece of repository-controlled text (names, branches, paths, commit
//! messages) goes through `Escaped` before it reaches markup. Text placed in
//! an `href` is percent-encoded instead, which also keeps it markup-safe.

use std::fmt::{self, Display, Write};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::git::repository::format_relative_time;
use crate::models::BrowsingContext;

/// Displays the wrapped text with HTML special characters escaped.
pub struct Escaped<'a>(pub &'a str);

impl Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '&' => f.write_str("&amp;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

/// Unreserved URL characters stay literal; everything else is encoded.
const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// One URL path segment or query value.
struct UrlPart<'a>(&'a str);

impl Display for UrlPart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", utf8_percent_encode(self.0, URL_COMPONENT))
    }
}

/// A relative path whose `/` separators survive encoding.
struct UrlPath<'a>(&'a str);

impl Display for UrlPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.split('/').enumerate() {
            if i > 0 {
                f.write_char('/')?;
            }
            write!(f, "{}", UrlPart(segment))?;
        }
        Ok(())
    }
}

/// Landing page listing every local mirror.
pub fn home(user: &str, repositories: &[String]) -> String {
    let mut page = String::new();
    let _ = write!(
        page,
        "<html>\n<h4><a href=\"/\">home</a></h4>\n<p>Git mirror of {}</p>\n\
         <details open>\n<summary>Projects</summary>\n<ul>\n",
        Escaped(user)
    );

    for repository in repositories {
        let _ = writeln!(
            page,
            "<li><a href=\"/{url}/tree/\">{name}</a></li>",
            url = UrlPart(repository),
            name = Escaped(repository)
        );
    }

    page.push_str("</ul>\n</details>\n</html>\n");
    page
}

/// Branches, commits and files of one directory on one branch.
pub fn context(repository: &str, path: &str, branch: &str, context: &BrowsingContext) -> String {
    let repo = Escaped(repository);
    let repo_url = UrlPart(repository);
    let branch_text = Escaped(branch);
    let branch_url = UrlPart(branch);
    let path_text = Escaped(path);
    let path_url = UrlPath(path);

    let mut page = String::new();
    let _ = write!(
        page,
        "<html>\n<h4><a href=\"/\">home</a> -&gt; \
         <a href=\"/{repo_url}/tree/?branch={branch_url}\">{repo}</a>/{path_text} ({branch_text})</h4>\n"
    );

    page.push_str("<details>\n<summary>Branches</summary>\n<ul>\n");
    for other in &context.branches {
        if other == branch {
            let _ = writeln!(page, "<li>{}</li>", Escaped(other));
        } else {
            let _ = writeln!(
                page,
                "<li><a href=\"/{repo_url}/tree/{path_url}?branch={url}\">{text}</a></li>",
                url = UrlPart(other),
                text = Escaped(other)
            );
        }
    }
    page.push_str("</ul>\n</details>\n");

    page.push_str("<details>\n<summary>Commits</summary>\n<ul>\n");
    for commit in &context.commits {
        let _ = writeln!(
            page,
            "<li><a href=\"/{repo_url}/commit/{oid}\">{summary}</a> {author}, {age}</li>",
            oid = commit.oid,
            summary = Escaped(commit.summary()),
            author = Escaped(&commit.author),
            age = format_relative_time(commit.timestamp),
        );
    }
    page.push_str("</ul>\n</details>\n");

    page.push_str("<details open>\n<summary>Files</summary>\n<ul>\n");
    for file in &context.files {
        let name = Escaped(&file.name);
        let name_url = UrlPart(&file.name);
        if file.is_dir {
            let _ = writeln!(
                page,
                "<li><a href=\"/{repo_url}/tree/{path_url}{name_url}/?branch={branch_url}\">{name}/</a></li>"
            );
        } else {
            let _ = writeln!(
                page,
                "<li><a href=\"/{repo_url}/tree/{path_url}{name_url}?branch={branch_url}\">{name}</a></li>"
            );
        }
    }
    page.push_str("</ul>\n</details>\n</html>\n");

    page
}
