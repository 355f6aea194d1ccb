use std::{
    borrow::Cow,
    io::{self, Write},
    path::PathBuf,
};

use indexmap::IndexMap;

use super::ReportKind;
use crate::error::{Error, Result};

/// Named values available to a template.
pub type Substitutions = IndexMap<String, String>;

/// A crude templating engine over plain text.
///
/// Templates use `{name}` placeholders; `{{` and `}}` produce literal braces.
/// Without a template directory the templates compiled into the binary are used.
#[derive(Debug, Clone, Default)]
pub struct Report {
    template_dir: Option<PathBuf>,
}

impl Report {
    /// Reads templates from `template_dir` instead of the bundled set.
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: Some(template_dir.into()),
        }
    }

    pub fn bundled() -> Self {
        Self::default()
    }

    /// Renders `template` to stdout. No newline is added after the template text.
    pub fn render(&self, template: &str, substitutions: &Substitutions) -> Result<()> {
        let mut stdout = io::stdout().lock();
        self.render_to(&mut stdout, template, substitutions)?;
        stdout.flush()?;
        Ok(())
    }

    pub fn render_to<W: Write>(
        &self,
        out: &mut W,
        template: &str,
        substitutions: &Substitutions,
    ) -> Result<()> {
        let rendered = self.render_to_string(template, substitutions)?;
        out.write_all(rendered.as_bytes())?;
        Ok(())
    }

    pub fn render_to_string(&self, template: &str, substitutions: &Substitutions) -> Result<String> {
        let text = self.load(template)?;
        substitute(template, &text, substitutions)
    }

    fn load(&self, template: &str) -> Result<Cow<'static, str>> {
        let Some(dir) = &self.template_dir else {
            return ReportKind::ALL
                .into_iter()
                .find(|kind| kind.template() == template)
                .map(|kind| Cow::Borrowed(kind.bundled_template()))
                .ok_or_else(|| Error::TemplateNotFound(PathBuf::from(template)));
        };

        let path = dir.join(template);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Cow::Owned(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::TemplateNotFound(path)),
            Err(e) => Err(e.into()),
        }
    }
}

fn substitute(name: &str, text: &str, substitutions: &Substitutions) -> Result<String> {
    let malformed = |reason: &str| Error::InvalidTemplate {
        template: name.to_string(),
        reason: reason.to_string(),
    };

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') => return Err(malformed("unexpected '{' in field name")),
                        Some(c) => key.push(c),
                        None => return Err(malformed("expected '}' before end of string")),
                    }
                }
                match substitutions.get(&key) {
                    Some(value) => out.push_str(value),
                    None => {
                        return Err(Error::MissingSubstitution {
                            template: name.to_string(),
                            key,
                        });
                    }
                }
            }
            '}' => return Err(malformed("single '}' encountered")),
            c => out.push(c),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn subs(pairs: &[(&str, &str)]) -> Substitutions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn report_with(name: &str, text: &str) -> (tempfile::TempDir, Report) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(name), text).unwrap();
        let report = Report::new(dir.path());
        (dir, report)
    }

    #[test]
    fn test_single_placeholder_has_no_trailing_newline() {
        let (_dir, report) = report_with("x.txt", "{x}");
        let mut out = Vec::new();
        report
            .render_to(&mut out, "x.txt", &subs(&[("x", "hi")]))
            .unwrap();
        assert_eq!(out, b"hi");
    }

    #[test]
    fn test_text_and_escapes() {
        let (_dir, report) = report_with("t.txt", "{{literal}} {a}-{b}\n{a}\n");
        let rendered = report
            .render_to_string("t.txt", &subs(&[("a", "1"), ("b", "two"), ("unused", "x")]))
            .unwrap();
        assert_eq!(rendered, "{literal} 1-two\n1\n");
    }

    #[test]
    fn test_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let report = Report::new(dir.path());
        let err = report.render_to_string("nope.txt", &subs(&[])).unwrap_err();
        let Error::TemplateNotFound(path) = err else {
            panic!("expected TemplateNotFound");
        };
        assert_eq!(path, dir.path().join("nope.txt"));
    }

    #[test]
    fn test_bundled_templates_need_no_directory() {
        let report = Report::bundled();
        let rendered = report
            .render_to_string(
                "ntp.txt",
                &subs(&[
                    ("probe", "1"),
                    ("timestamp", "-"),
                    ("target", "pool.ntp.org"),
                    ("stratum", "2"),
                    ("offsets", "+0.000100s"),
                    ("rtts", "12.000"),
                ]),
            )
            .unwrap();
        assert_eq!(
            rendered,
            "Probe #1 -  pool.ntp.org: stratum 2, offset +0.000100s, rtt 12.000 ms\n"
        );

        let err = report.render_to_string("custom.txt", &subs(&[])).unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound(_)));
    }

    #[test]
    fn test_template_directory_overrides_bundled() {
        let (_dir, report) = report_with("ping.txt", "{probe} only");
        let rendered = report
            .render_to_string("ping.txt", &subs(&[("probe", "9")]))
            .unwrap();
        assert_eq!(rendered, "9 only");
    }

    #[test]
    fn test_missing_substitution() {
        let (_dir, report) = report_with("t.txt", "{present} {absent}");
        let err = report
            .render_to_string("t.txt", &subs(&[("present", "yes")]))
            .unwrap_err();
        let Error::MissingSubstitution { template, key } = err else {
            panic!("expected MissingSubstitution");
        };
        assert_eq!(template, "t.txt");
        assert_eq!(key, "absent");
    }

    #[test]
    fn test_malformed_templates() {
        for text in ["{open", "close}", "{a{b}}"] {
            let (_dir, report) = report_with("t.txt", text);
            let err = report
                .render_to_string("t.txt", &subs(&[("a", "1"), ("open", "1")]))
                .unwrap_err();
            assert!(matches!(err, Error::InvalidTemplate { .. }), "{text:?}");
        }
    }
}
