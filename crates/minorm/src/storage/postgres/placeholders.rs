//! Positional placeholder renumbering.
//!
//! PostgreSQL only accepts numbered parameters (`$1`, `$2`, ...). Statements
//! are written with `?`, so each `?` outside quoted text is replaced by the
//! next number. Nothing else in the statement is touched.

/// Rewrites `?` placeholders into `$1..$n`.
///
/// Question marks inside single-quoted literals, double-quoted identifiers
/// and `--` line comments are left alone.
pub fn number_placeholders(stmt: &str) -> String {
    let mut out = String::with_capacity(stmt.len() + 8);
    let mut chars = stmt.chars().peekable();
    let mut next = 1;

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                out.push(c);
                // '' and "" are escaped quotes and keep the literal open.
                while let Some(inner) = chars.next() {
                    out.push(inner);
                    if inner == c {
                        if chars.peek() == Some(&c) {
                            out.push(c);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                out.push(c);
                for inner in chars.by_ref() {
                    out.push(inner);
                    if inner == '\n' {
                        break;
                    }
                }
            }
            '?' => {
                out.push('$');
                out.push_str(&next.to_string());
                next += 1;
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_placeholders_in_order() {
        assert_eq!(
            number_placeholders("UPDATE users SET name = ?, email = ? WHERE id = ?"),
            "UPDATE users SET name = $1, email = $2 WHERE id = $3"
        );
    }

    #[test]
    fn test_statement_without_placeholders_is_unchanged() {
        let stmt = "SELECT * FROM users";
        assert_eq!(number_placeholders(stmt), stmt);
    }

    #[test]
    fn test_question_marks_in_literals_are_kept() {
        assert_eq!(
            number_placeholders("SELECT * FROM t WHERE a = '?' AND b = ?"),
            "SELECT * FROM t WHERE a = '?' AND b = $1"
        );
        assert_eq!(
            number_placeholders("SELECT \"odd?col\" FROM t WHERE id = ?"),
            "SELECT \"odd?col\" FROM t WHERE id = $1"
        );
    }

    #[test]
    fn test_escaped_quotes_keep_literal_open() {
        assert_eq!(
            number_placeholders("SELECT 'it''s ?' , ?"),
            "SELECT 'it''s ?' , $1"
        );
    }

    #[test]
    fn test_line_comments_are_skipped() {
        assert_eq!(
            number_placeholders("SELECT ? -- why?\nFROM t WHERE id = ?"),
            "SELECT $1 -- why?\nFROM t WHERE id = $2"
        );
    }

    #[test]
    fn test_insert_placeholders() {
        assert_eq!(
            number_placeholders("INSERT INTO posts (title, user_id) VALUES (?, ?)"),
            "INSERT INTO posts (title, user_id) VALUES ($1, $2)"
        );
    }
}
