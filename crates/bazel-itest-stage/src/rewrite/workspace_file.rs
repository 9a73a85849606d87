//! `WORKSPACE` repository rewriting.
//!
//! A `local_repository`, `http_archive` or `git_repository` declaration whose
//! first argument is `name = "<repo>"` is replaced by an `http_archive` that
//! fetches a locally built archive through a `file:` URL. The declaration body
//! is delimited by a parenthesis scan that skips comments and string literals
//! (triple-quoted ones included), so nested calls such as `Label("...")` or
//! `glob([...])` stay inside it. An unterminated declaration is an error.

use std::path::Path;

use bazel_itest_core::{ItestError, Result, Runfiles};
use bazel_itest_fs::{read_file, write_file};
use indexmap::IndexMap;

use super::{compile, log_file_contents, portable_path, WORKSPACE};

const DECLARATION_KINDS: &[&str] = &["local_repository", "http_archive", "git_repository"];

/// Point every configured repository at its local archive, then write the
/// file back. Aborts on the first repository whose archive path is absent
/// from the result.
pub fn replace_repositories(
    runfiles: &Runfiles,
    repositories: &IndexMap<String, String>,
    workspace_root: &Path,
) -> Result<()> {
    let path = workspace_root.join(WORKSPACE);
    let mut contents = read_file(&path)?;
    for (name, logical) in repositories {
        let archive = portable_path(&runfiles.rlocation(logical)?);
        contents = replace_repository(&contents, name, &archive)?;
        if !contents.contains(&archive) {
            return Err(ItestError::RepositoryReplacement(name.clone()));
        }
    }
    write_file(&path, &contents)?;
    log_file_contents("WORKSPACE file with replacements:", &contents);
    Ok(())
}

/// Replace the first declaration of repository `name` with a local archive
/// declaration. Contents are returned unchanged when no declaration matches;
/// a declaration without a closing parenthesis is an error.
pub fn replace_repository(contents: &str, name: &str, archive: &str) -> Result<String> {
    let head = compile(&format!(
        r#"(?:{})\(\s*name\s*=\s*"{}""#,
        DECLARATION_KINDS.join("|"),
        regex::escape(name)
    ))?;
    let Some(found) = head.find(contents) else {
        return Ok(contents.to_string());
    };
    let close = closing_paren(contents, found.end())
        .ok_or_else(|| ItestError::RepositoryReplacement(name.to_string()))?;

    let mut out = String::with_capacity(contents.len() + 128);
    out.push_str(&contents[..found.start()]);
    out.push_str(&declaration(name, archive));
    out.push_str(&contents[close..]);
    Ok(out)
}

/// Replacement text; the declaration's own closing parenthesis follows it.
pub fn declaration(name: &str, archive: &str) -> String {
    format!(
        "load(\"@bazel_tools//tools/build_defs/repo:http.bzl\", \"http_archive\")\n\
         http_archive(\n  name = \"{}\",\n  url=\"file:{}\"\n",
        name, archive
    )
}

/// Byte offset of the parenthesis closing the call whose arguments start at
/// `from`, or `None` if the call is unterminated.
fn closing_paren(contents: &str, from: usize) -> Option<usize> {
    let bytes = contents.as_bytes();
    let mut depth = 0usize;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'#' => {
                i = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(bytes.len(), |n| i + n);
                continue;
            }
            b'"' | b'\'' => {
                i = string_end(bytes, i)?;
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' if depth == 0 => return Some(i),
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Offset just past the string literal opening at `start`. Handles `"""` and
/// `'''` literals; a single-quoted literal may not span lines.
fn string_end(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let delim_len = if bytes[start..].starts_with(&[quote; 3]) { 3 } else { 1 };
    let delim = &bytes[start..start + delim_len];
    let mut i = start + delim_len;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' if delim_len == 1 => return None,
            _ if bytes[i..].starts_with(delim) => return Some(i + delim_len),
            _ => i += 1,
        }
    }
    None
}
