//! What each command types, per language
//!
//! Handlers are pure: they read the [`DictationContext`] and return the
//! emissions to perform, leaving injection to the processor. A language
//! without the construct a command asks for gets an empty plan.

use super::commands::CodeCommand;
use super::keys::KeyPress;
use crate::format::{camel_case, pascal_case, snake_case};
use crate::language::Language;
use tracing::{debug, info};

/// One side effect on the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    Text(String),
    Keys(Vec<KeyPress>),
}

impl Emission {
    fn text(s: impl Into<String>) -> Self {
        Emission::Text(s.into())
    }
}

/// State threaded through every command handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictationContext {
    pub language: Language,
    /// Only emit Go method declarations while in Go mode
    pub strict_class_functions: bool,
}

impl Default for DictationContext {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl DictationContext {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            strict_class_functions: false,
        }
    }

    pub fn with_strict_class_functions(mut self, strict: bool) -> Self {
        self.strict_class_functions = strict;
        self
    }
}

pub fn switch_mode(ctx: &mut DictationContext, language: Language) {
    if ctx.language != language {
        info!(from = %ctx.language, to = %language, "Switching mode");
    }
    ctx.language = language;
}

pub fn create_class(ctx: &DictationContext, name: &str) -> Vec<Emission> {
    match ctx.language {
        Language::Python => vec![Emission::text(format!(
            "class {}():\n    ",
            pascal_case(name)
        ))],
        Language::Go => vec![],
    }
}

pub fn create_public_function(ctx: &DictationContext, name: &str) -> Vec<Emission> {
    match ctx.language {
        Language::Python => vec![Emission::text(format!("def {}(", snake_case(name)))],
        Language::Go => vec![Emission::text(format!("func {}(", pascal_case(name)))],
    }
}

pub fn create_private_function(ctx: &DictationContext, name: &str) -> Vec<Emission> {
    match ctx.language {
        Language::Python => vec![Emission::text(format!("def _{}(", snake_case(name)))],
        Language::Go => vec![Emission::text(format!("func {}(", camel_case(name)))],
    }
}

/// Go method with a pointer receiver
pub fn create_class_function(
    ctx: &DictationContext,
    receiver: &str,
    method: &str,
) -> Vec<Emission> {
    if ctx.strict_class_functions && ctx.language != Language::Go {
        return vec![];
    }
    vec![Emission::text(format!(
        "func (x *{}) {}(",
        pascal_case(receiver),
        pascal_case(method)
    ))]
}

/// Close the parameter list and open the body
pub fn close_function(ctx: &DictationContext) -> Vec<Emission> {
    match ctx.language {
        Language::Python => vec![Emission::text("):\n")],
        Language::Go => vec![
            Emission::text(") {\n\n"),
            Emission::Keys(vec![KeyPress::Up, KeyPress::Tab]),
        ],
    }
}

/// Print statement with the cursor left inside the parentheses
pub fn print_line(ctx: &DictationContext) -> Vec<Emission> {
    let statement = match ctx.language {
        Language::Python => "print()",
        Language::Go => "fmt.Println()",
    };
    vec![
        Emission::text(statement),
        Emission::Keys(vec![KeyPress::Left]),
    ]
}

/// Leave and re-enter insert mode, then start a line comment
pub fn comment(ctx: &DictationContext) -> Vec<Emission> {
    let marker = match ctx.language {
        Language::Python => "# ",
        Language::Go => "// ",
    };
    vec![
        Emission::Keys(vec![KeyPress::Escape, KeyPress::Char('i')]),
        Emission::text(marker),
    ]
}

pub fn null(ctx: &DictationContext) -> Vec<Emission> {
    match ctx.language {
        Language::Python => vec![Emission::text("None")],
        Language::Go => vec![Emission::text("nil")],
    }
}

/// Plan the emissions for a command, applying any context change it makes
pub fn plan(command: &CodeCommand, ctx: &mut DictationContext) -> Vec<Emission> {
    let emissions = match command {
        CodeCommand::SwitchMode(language) => {
            switch_mode(ctx, *language);
            vec![]
        }
        CodeCommand::CreateClass { name } => create_class(ctx, name),
        CodeCommand::CreatePublicFunction { name } => create_public_function(ctx, name),
        CodeCommand::CreatePrivateFunction { name } => create_private_function(ctx, name),
        CodeCommand::CreateClassFunction { receiver, method } => {
            create_class_function(ctx, receiver, method)
        }
        CodeCommand::CloseFunction => close_function(ctx),
        CodeCommand::PrintLine => print_line(ctx),
        CodeCommand::Comment => comment(ctx),
        CodeCommand::Null => null(ctx),
        CodeCommand::Insert(text) => vec![Emission::text(*text)],
        CodeCommand::Custom { text, keys, mode } => {
            if mode.is_some_and(|m| m != ctx.language) {
                vec![]
            } else {
                let mut out = Vec::new();
                if !text.is_empty() {
                    out.push(Emission::text(text.clone()));
                }
                if !keys.is_empty() {
                    out.push(Emission::Keys(keys.clone()));
                }
                out
            }
        }
    };

    if emissions.is_empty() {
        debug!(?command, language = %ctx.language, "Nothing to emit");
    }
    emissions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python() -> DictationContext {
        DictationContext::new(Language::Python)
    }

    fn go() -> DictationContext {
        DictationContext::new(Language::Go)
    }

    fn text(s: &str) -> Emission {
        Emission::Text(s.to_string())
    }

    #[test]
    fn test_switch_mode_is_idempotent() {
        let mut ctx = go();
        switch_mode(&mut ctx, Language::Python);
        switch_mode(&mut ctx, Language::Python);
        assert_eq!(ctx.language, Language::Python);
    }

    #[test]
    fn test_create_class() {
        assert_eq!(
            create_class(&python(), "user account"),
            vec![text("class UserAccount():\n    ")]
        );
        // Go has no classes
        assert!(create_class(&go(), "user account").is_empty());
    }

    #[test]
    fn test_public_function() {
        assert_eq!(create_public_function(&python(), "doThing"), vec![text("def do_thing(")]);
        assert_eq!(create_public_function(&go(), "doThing"), vec![text("func DoThing(")]);
    }

    #[test]
    fn test_private_function() {
        assert_eq!(create_private_function(&python(), "doThing"), vec![text("def _do_thing(")]);
        assert_eq!(create_private_function(&go(), "doThing"), vec![text("func doThing(")]);
    }

    #[test]
    fn test_class_function_ignores_mode_by_default() {
        let expected = vec![text("func (x *Foo) Bar(")];
        assert_eq!(create_class_function(&go(), "foo", "bar"), expected);
        assert_eq!(create_class_function(&python(), "foo", "bar"), expected);
    }

    #[test]
    fn test_class_function_strict() {
        let ctx = python().with_strict_class_functions(true);
        assert!(create_class_function(&ctx, "foo", "bar").is_empty());

        let ctx = go().with_strict_class_functions(true);
        assert_eq!(
            create_class_function(&ctx, "foo", "bar"),
            vec![text("func (x *Foo) Bar(")]
        );
    }

    #[test]
    fn test_close_function() {
        assert_eq!(close_function(&python()), vec![text("):\n")]);
        assert_eq!(
            close_function(&go()),
            vec![
                text(") {\n\n"),
                Emission::Keys(vec![KeyPress::Up, KeyPress::Tab])
            ]
        );
    }

    #[test]
    fn test_print_line_moves_cursor_inside() {
        assert_eq!(
            print_line(&python()),
            vec![text("print()"), Emission::Keys(vec![KeyPress::Left])]
        );
        assert_eq!(
            print_line(&go()),
            vec![text("fmt.Println()"), Emission::Keys(vec![KeyPress::Left])]
        );
    }

    #[test]
    fn test_comment_reenters_insert_mode_first() {
        let keys = Emission::Keys(vec![KeyPress::Escape, KeyPress::Char('i')]);
        assert_eq!(comment(&python()), vec![keys.clone(), text("# ")]);
        assert_eq!(comment(&go()), vec![keys, text("// ")]);
    }

    #[test]
    fn test_null() {
        assert_eq!(null(&python()), vec![text("None")]);
        assert_eq!(null(&go()), vec![text("nil")]);
    }

    #[test]
    fn test_plan_switch_mode_changes_context() {
        let mut ctx = go();
        let out = plan(&CodeCommand::SwitchMode(Language::Python), &mut ctx);
        assert!(out.is_empty());
        assert_eq!(ctx.language, Language::Python);
        assert_eq!(plan(&CodeCommand::Null, &mut ctx), vec![text("None")]);
    }

    #[test]
    fn test_plan_insert_ignores_mode() {
        for lang in Language::ALL {
            let mut ctx = DictationContext::new(lang);
            assert_eq!(plan(&CodeCommand::Insert(":= "), &mut ctx), vec![text(":= ")]);
        }
    }

    #[test]
    fn test_plan_custom_respects_mode() {
        let cmd = CodeCommand::Custom {
            text: "if err != nil {".to_string(),
            keys: vec![KeyPress::Enter],
            mode: Some(Language::Go),
        };
        assert!(plan(&cmd, &mut python()).is_empty());
        assert_eq!(
            plan(&cmd, &mut go()),
            vec![text("if err != nil {"), Emission::Keys(vec![KeyPress::Enter])]
        );
    }
}
