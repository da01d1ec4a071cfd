//! Path normalization
//!
//! Collapses repeated separators and resolves `.` and `..` components of a
//! `\`-separated path before it is resolved against the directory tree.
//!
//! The `..` detection treats a dot pair as a parent reference whenever it
//! follows a separator, even when more characters follow it (so `\a\..abc`
//! collapses to `\bc`). Paths ending in `..` glued to a name are shortened
//! one character per pass.

use crate::types::PATH_SEPARATOR;
use alloc::string::String;
use alloc::vec::Vec;

const SEP: char = PATH_SEPARATOR;
const NUL: char = '\0';

/// NUL-terminated character buffer edited in place
struct PathBuffer {
    chars: Vec<char>,
}

impl PathBuffer {
    fn new(path: &str) -> Self {
        let mut chars: Vec<char> = path.chars().collect();
        chars.push(NUL);
        Self { chars }
    }

    fn at(&self, index: isize) -> char {
        if index < 0 {
            return NUL;
        }
        self.chars.get(index as usize).copied().unwrap_or(NUL)
    }

    fn set(&mut self, index: isize, c: char) {
        if index < 0 {
            return;
        }
        if let Some(slot) = self.chars.get_mut(index as usize) {
            *slot = c;
        }
    }

    fn len_from(&self, index: isize) -> isize {
        let mut len = 0;
        while self.at(index + len) != NUL {
            len += 1;
        }
        len
    }

    /// Move the string starting at `src` (terminator included) down to `dst`
    fn replace_left(&mut self, dst: isize, src: isize) {
        let end = src + self.len_from(src);
        let (mut dst, mut src) = (dst, src);
        while src <= end {
            let c = self.at(src);
            self.set(dst, c);
            dst += 1;
            src += 1;
        }
    }

    /// Drop the separators repeated after the one at `index`
    fn collapse_separators(&mut self, index: isize) -> isize {
        if self.at(index + 1) != SEP {
            return index + 1;
        }

        let mut run_end = index;
        while self.at(run_end) == SEP {
            run_end += 1;
        }
        if run_end - 1 > index {
            self.replace_left(index + 1, run_end);
        }

        index + 1
    }

    fn strip_trailing_separator(&mut self) {
        let len = self.len_from(0);
        if len > 1 && self.at(len - 1) == SEP {
            self.set(len - 1, NUL);
        }
    }

    fn into_string(self) -> String {
        self.chars.into_iter().take_while(|&c| c != NUL).collect()
    }
}

/// Normalize a `\`-separated path
///
/// Leading and trailing spaces are trimmed, runs of separators are
/// collapsed, a trailing separator is removed (except for a bare `\`), `.`
/// components are dropped and `..` removes the preceding component. An
/// empty result means the path collapsed to nothing.
pub fn mangle_file_name(path: &str) -> String {
    let mut buf = PathBuffer::new(path.trim_matches(' '));
    if buf.at(0) == NUL {
        return String::new();
    }

    buf.strip_trailing_separator();

    let mut cursor: isize = 0;
    if buf.at(0) == '.' {
        if buf.at(1) == '.' {
            if buf.at(2) == NUL {
                return buf.into_string();
            }
            cursor += 2;
        } else if buf.at(1) == NUL {
            return buf.into_string();
        }
    }

    while buf.at(cursor) != NUL {
        match buf.at(cursor) {
            SEP => cursor = buf.collapse_separators(cursor),
            '.' => match buf.at(cursor + 1) {
                NUL => buf.set(cursor, NUL),
                SEP => {
                    let next = buf.collapse_separators(cursor + 1);
                    buf.replace_left(cursor, next);
                }
                '.' => {
                    if buf.at(cursor - 1) != SEP
                        && (buf.at(cursor + 2) != SEP || buf.at(cursor + 2) != NUL)
                    {
                        cursor += 1;
                        continue;
                    }
                    cursor = collapse_parent(&mut buf, cursor);
                }
                _ => cursor += 1,
            },
            _ => cursor += 1,
        }
    }

    buf.strip_trailing_separator();
    buf.into_string()
}

/// Remove the component before the `..` at `dots`; returns the new cursor
fn collapse_parent(buf: &mut PathBuffer, dots: isize) -> isize {
    let mut separators = 0;
    let mut start = dots - 1;
    while start >= 0 {
        if buf.at(start) == SEP {
            separators += 1;
            if separators == 2 {
                break;
            }
        }
        start -= 1;
    }
    start += 1;

    if buf.at(start) == '.' && buf.at(start + 1) == '.' {
        return dots + 2;
    }

    if buf.at(dots + 2) != NUL {
        buf.replace_left(start, dots + 3);
        if buf.at(start - 1) == SEP {
            buf.collapse_separators(start - 1);
        }
    } else {
        buf.set(start, NUL);
    }

    start
}
