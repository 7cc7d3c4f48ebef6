use itertools::Itertools;

use crate::css_var_name;

/// A token value as written by Tokens Studio: plain text, `{group.token}`
/// references, and arithmetic over them.
#[derive(Debug, PartialEq)]
pub enum Expression {
    Ref(Vec<String>),
    Add(Box<Expression>, Box<Expression>),
    Sub(Box<Expression>, Box<Expression>),
    Mul(Box<Expression>, Box<Expression>),
    Div(Box<Expression>, Box<Expression>),
    Text(String),
    Concat(Vec<Expression>),
}
impl Expression {
    pub fn to_css(&self, prefix: Option<&str>) -> String {
        match self {
            Expression::Ref(path) => {
                let segments = prefix
                    .into_iter()
                    .chain(path.iter().map(String::as_str))
                    .collect::<Vec<_>>();
                format!("var({})", css_var_name(segments.as_slice()))
            }
            Expression::Add(a, b) => format!("calc({} + {})", a.to_css(prefix), b.to_css(prefix)),
            Expression::Sub(a, b) => format!("calc({} - {})", a.to_css(prefix), b.to_css(prefix)),
            Expression::Mul(a, b) => format!("calc({} * {})", a.to_css(prefix), b.to_css(prefix)),
            Expression::Div(a, b) => format!("calc({} / {})", a.to_css(prefix), b.to_css(prefix)),
            Expression::Text(text) => text.clone(),
            Expression::Concat(parts) => parts.iter().map(|part| part.to_css(prefix)).join(""),
        }
    }
}

/// Renders references in `text` as CSS. Text without a `{` is returned as-is,
/// and so is anything the grammar rejects.
pub fn render_css(text: &str, prefix: Option<&str>) -> String {
    if !text.contains('{') {
        return text.to_string();
    }
    match expr_parser::value(text) {
        Ok(expr) => expr.to_css(prefix),
        Err(err) => {
            log::debug!("keeping `{text}` literally: {err}");
            text.to_string()
        }
    }
}

peg::parser! {
  grammar expr_parser() for str {
    rule _ = quiet!{[' ' | '\n' | '\t']*}

    rule reference() -> Expression
        = "{" v:($((!"}" !"." !"{" [_])+) ++ ".") "}" { Expression::Ref(v.iter().map(|x| x.to_string()).collect()) }

    rule number() -> Expression
        = v:$("-"? ['0'..='9' | '.']+ ['a'..='z' | 'A'..='Z' | '%']*) { Expression::Text(v.to_string()) }

    rule math() -> Expression = precedence!{
        x:(@) _ "+" _ y:@ { Expression::Add(Box::new(x), Box::new(y)) }
        x:(@) _ "-" _ y:@ { Expression::Sub(Box::new(x), Box::new(y)) }
        --
        x:(@) _ "*" _ y:@ { Expression::Mul(Box::new(x), Box::new(y)) }
        x:(@) _ "/" _ y:@ { Expression::Div(Box::new(x), Box::new(y)) }
        --
        r:reference() { r }
        n:number() { n }
    }

    rule text() -> Expression
        = v:$((!"{" [_])+) { Expression::Text(v.to_string()) }

    pub(crate) rule value() -> Expression
        = parts:(math() / text())+ {
            let mut parts = parts;
            if parts.len() == 1 { parts.remove(0) } else { Expression::Concat(parts) }
        }
  }
}

#[test]
fn test() {
    assert_eq!(
        expr_parser::value("{hello.world}").unwrap(),
        Expression::Ref(vec!["hello".to_string(), "world".to_string()])
    );
    assert_eq!(
        expr_parser::value("{x} * {y}").unwrap(),
        Expression::Mul(
            Box::new(Expression::Ref(vec!["x".to_string()])),
            Box::new(Expression::Ref(vec!["y".to_string()])),
        )
    );
    assert_eq!(
        expr_parser::value("{x}/5").unwrap(),
        Expression::Div(
            Box::new(Expression::Ref(vec!["x".to_string()])),
            Box::new(Expression::Text("5".to_string())),
        )
    );
    assert_eq!(
        expr_parser::value("1px solid {colors.border}").unwrap(),
        Expression::Concat(vec![
            Expression::Text("1px".to_string()),
            Expression::Text(" solid ".to_string()),
            Expression::Ref(vec!["colors".to_string(), "border".to_string()]),
        ])
    );
    assert!(expr_parser::value("{}").is_err());
}

#[test]
fn renders_css() {
    assert_eq!(render_css("{spacing.base} * 2", None), "calc(var(--spacing-base) * 2)");
    assert_eq!(
        render_css("{a} + {b} * 2", None),
        "calc(var(--a) + calc(var(--b) * 2))"
    );
    assert_eq!(
        render_css("rgba({colors.black}, 0.5)", Some("ds")),
        "rgba(var(--ds-colors-black), 0.5)"
    );
    assert_eq!(render_css("16px/1.5", None), "16px/1.5");
    assert_eq!(render_css("{broken", None), "{broken");
}
