//! CSS emitter for atomic builds.
//!
//! Serializes a [`BuildView`] into CSS text. Namespaced views prefix every
//! selector with the namespace; the directional aliases `__START__` and
//! `__END__` are resolved from [`Settings`].
//!
//! ```text
//! BuildView + Settings → generate() → "selector {\n  prop: value;\n}\n"
//! ```

use atomic_core::{BuildView, Declarations, Settings};

/// Placeholder for the inline-start side (`left` in LTR builds).
pub const START_ALIAS: &str = "__START__";
/// Placeholder for the inline-end side (`right` in LTR builds).
pub const END_ALIAS: &str = "__END__";

/// Output options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitOptions {
    pub minify: bool,
}

/// CSS emission error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Emit error: {message}")]
pub struct EmitError {
    pub message: String,
}

/// Generate CSS from a build view.
pub fn generate(
    view: &BuildView<'_>,
    settings: &Settings,
    options: &EmitOptions,
) -> Result<String, EmitError> {
    let mut css = String::new();

    for (selector, declarations) in view.build() {
        if selector.trim().is_empty() {
            return Err(EmitError {
                message: "empty selector".into(),
            });
        }
        let selector = resolve_aliases(selector, settings);
        let selector = match view.namespace() {
            Some(namespace) => split_selector_list(&selector)
                .into_iter()
                .map(|part| format!("{namespace} {part}"))
                .collect::<Vec<_>>()
                .join(", "),
            None => selector,
        };

        if options.minify {
            write_minified(&mut css, &selector, declarations, settings)?;
        } else {
            if !css.is_empty() {
                css.push('\n');
            }
            write_pretty(&mut css, &selector, declarations, settings)?;
        }
    }

    Ok(css)
}

fn write_pretty(
    out: &mut String,
    selector: &str,
    declarations: &Declarations,
    settings: &Settings,
) -> Result<(), EmitError> {
    out.push_str(selector);
    out.push_str(" {\n");
    for (property, value) in declarations {
        let (property, value) = resolve_declaration(selector, property, value, settings)?;
        out.push_str(&format!("  {property}: {value};\n"));
    }
    out.push_str("}\n");
    Ok(())
}

fn write_minified(
    out: &mut String,
    selector: &str,
    declarations: &Declarations,
    settings: &Settings,
) -> Result<(), EmitError> {
    out.push_str(selector);
    out.push('{');
    for (property, value) in declarations {
        let (property, value) = resolve_declaration(selector, property, value, settings)?;
        out.push_str(&format!("{property}:{value};"));
    }
    out.push('}');
    Ok(())
}

fn resolve_declaration(
    selector: &str,
    property: &str,
    value: &str,
    settings: &Settings,
) -> Result<(String, String), EmitError> {
    if property.trim().is_empty() {
        return Err(EmitError {
            message: format!("empty property name in `{selector}`"),
        });
    }
    Ok((
        resolve_aliases(property, settings),
        resolve_aliases(value, settings),
    ))
}

/// Split a selector list on its top-level commas.
///
/// Commas inside parentheses, brackets or quotes (`:not(.a, .b)`,
/// `[title="a,b"]`) belong to a single selector.
pub fn split_selector_list(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, ch) in selector.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(selector[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(selector[start..].trim());
    parts
}

/// Replace `__START__`/`__END__` with the configured directions.
pub fn resolve_aliases(text: &str, settings: &Settings) -> String {
    if !text.contains("__") {
        return text.to_string();
    }
    text.replace(START_ALIAS, settings.start())
        .replace(END_ALIAS, settings.end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use atomic_core::Build;
    use pretty_assertions::assert_eq;

    fn build(rules: &[(&str, &[(&str, &str)])]) -> Build {
        rules
            .iter()
            .map(|(selector, decls)| {
                (
                    selector.to_string(),
                    decls
                        .iter()
                        .map(|(p, v)| (p.to_string(), v.to_string()))
                        .collect(),
                )
            })
            .collect()
    }

    fn pretty() -> EmitOptions {
        EmitOptions::default()
    }

    #[test]
    fn test_empty_build() {
        let b = Build::new();
        let css = generate(&BuildView::Plain(&b), &Settings::default(), &pretty()).unwrap();
        assert_eq!(css, "");
    }

    #[test]
    fn test_pretty_output() {
        let b = build(&[
            (".Fw-b", &[("font-weight", "bold")]),
            (".Px-1", &[("padding-left", "10px"), ("padding-right", "10px")]),
        ]);
        let css = generate(&BuildView::Plain(&b), &Settings::default(), &pretty()).unwrap();
        assert_eq!(
            css,
            ".Fw-b {\n  font-weight: bold;\n}\n\n.Px-1 {\n  padding-left: 10px;\n  padding-right: 10px;\n}\n"
        );
    }

    #[test]
    fn test_minified_output() {
        let b = build(&[
            (".Fw-b", &[("font-weight", "bold")]),
            (".Fw-n", &[("font-weight", "normal")]),
        ]);
        let css = generate(
            &BuildView::Plain(&b),
            &Settings::default(),
            &EmitOptions { minify: true },
        )
        .unwrap();
        assert_eq!(css, ".Fw-b{font-weight:bold;}.Fw-n{font-weight:normal;}");
    }

    #[test]
    fn test_namespaced_output() {
        let b = build(&[(".Foo", &[("font-weight", "bold")])]);
        let view = BuildView::Namespaced {
            namespace: "#atomic",
            build: &b,
        };
        let css = generate(&view, &Settings::default(), &pretty()).unwrap();
        assert_eq!(css, "#atomic .Foo {\n  font-weight: bold;\n}\n");
    }

    #[test]
    fn test_namespaced_selector_list() {
        let b = build(&[(".a, .b", &[("color", "red")])]);
        let view = BuildView::Namespaced {
            namespace: "#atomic",
            build: &b,
        };
        let css = generate(&view, &Settings::default(), &EmitOptions { minify: true }).unwrap();
        assert_eq!(css, "#atomic .a, #atomic .b{color:red;}");
    }

    #[test]
    fn test_namespaced_nested_comma() {
        let b = build(&[(".Foo:not(.a, .b)", &[("color", "red")])]);
        let view = BuildView::Namespaced {
            namespace: "#atomic",
            build: &b,
        };
        let css = generate(&view, &Settings::default(), &EmitOptions { minify: true }).unwrap();
        assert_eq!(css, "#atomic .Foo:not(.a, .b){color:red;}");
    }

    #[test]
    fn test_split_selector_list() {
        assert_eq!(split_selector_list(".a"), vec![".a"]);
        assert_eq!(split_selector_list(".a , .b"), vec![".a", ".b"]);
        assert_eq!(
            split_selector_list(".x:is(.a, .b), .y"),
            vec![".x:is(.a, .b)", ".y"]
        );
        assert_eq!(
            split_selector_list(r#"[title="a,b"], .c"#),
            vec![r#"[title="a,b"]"#, ".c"]
        );
        assert_eq!(split_selector_list(r".a\,b, .c"), vec![r".a\,b", ".c"]);
    }

    #[test]
    fn test_directional_aliases_ltr() {
        let b = build(&[(".Fl-start", &[("float", "__START__"), ("margin-__END__", "0")])]);
        let css = generate(&BuildView::Plain(&b), &Settings::default(), &pretty()).unwrap();
        assert!(css.contains("float: left;"));
        assert!(css.contains("margin-right: 0;"));
    }

    #[test]
    fn test_directional_aliases_rtl() {
        let settings = Settings {
            start: Some("right".into()),
            end: Some("left".into()),
            ..Settings::default()
        };
        let b = build(&[(".Fl-start", &[("float", "__START__")])]);
        let css = generate(&BuildView::Plain(&b), &settings, &pretty()).unwrap();
        assert_eq!(css, ".Fl-start {\n  float: right;\n}\n");
    }

    #[test]
    fn test_empty_property_rejected() {
        let b = build(&[(".Foo", &[("", "bold")])]);
        let err = generate(&BuildView::Plain(&b), &Settings::default(), &pretty()).unwrap_err();
        assert!(err.to_string().contains(".Foo"));
    }

    #[test]
    fn test_empty_selector_rejected() {
        let b = build(&[(" ", &[("color", "red")])]);
        assert!(generate(&BuildView::Plain(&b), &Settings::default(), &pretty()).is_err());
    }

    // =========================================================================
    // Integration: engine → CSS
    // =========================================================================

    #[test]
    fn test_engine_to_css() {
        let catalog = atomic_core::Catalog::from_json(
            r#"[
                {"type": "rule", "id": "clearfix",
                 "rule": {".cf:after": {"content": "\"\"", "clear": "both"}}},
                {"type": "pattern", "id": "float", "prefix": ".Fl-",
                 "properties": ["float"],
                 "rules": [{"suffix": "start", "values": ["__START__"]},
                           {"suffix": "end", "values": ["__END__"]}]}
            ]"#,
        )
        .unwrap();
        let config = atomic_core::Config::from_json(
            r##"{"config": {"namespace": "#atomic", "start": "right", "end": "left"},
                "clearfix": true, "float": {"start": true}}"##,
        )
        .unwrap();

        let engine = atomic_core::Engine::new(catalog, config).unwrap();
        let settings = engine.config().unwrap().settings.clone().unwrap_or_default();
        let css = generate(&engine.build_view().unwrap(), &settings, &pretty()).unwrap();
        assert_eq!(
            css,
            "#atomic .Fl-start {\n  float: right;\n}\n\n#atomic .cf:after {\n  clear: both;\n  content: \"\";\n}\n"
        );
    }

    #[test]
    fn test_demo_build() {
        let catalog =
            atomic_core::Catalog::from_json(include_str!("../../../demos/catalog.json")).unwrap();
        let config =
            atomic_core::Config::from_json(include_str!("../../../demos/config.json")).unwrap();

        let engine = atomic_core::Engine::new(catalog, config).unwrap();
        let settings = engine.config().unwrap().settings.clone().unwrap_or_default();
        let css = generate(
            &engine.build_view().unwrap(),
            &settings,
            &EmitOptions { minify: true },
        )
        .unwrap();

        assert_eq!(engine.build().len(), 10);
        assert!(css.contains("#atomic .Fl-start{float:left;}"));
        assert!(css.contains("#atomic .Fl-end{float:right;}"));
        assert!(css.contains("#atomic .Fw-600{font-weight:600;}"));
        assert!(css.contains(
            "#atomic .Bd-x--b{border-left:2px dashed red;border-right:2px dashed red;}"
        ));
        assert!(css.contains("#atomic .cf:before, #atomic .cf:after{content:\" \";display:table;}"));
        assert!(!css.contains(".Fw-n"));
    }
}
