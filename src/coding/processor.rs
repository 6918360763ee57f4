//! Main dictation processor
//!
//! Recognizes utterances, updates the dictation context and sends the
//! resulting emissions to the injector. Utterances are handled one at a
//! time, each running to completion before the next.

use super::actions::{plan, DictationContext, Emission};
use super::commands::{CodeCommand, CommandParser};
use super::input::{InjectError, Injector};
use crate::language::Language;
use tracing::debug;

/// Result of processing an utterance
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessResult {
    /// Command recognized and its emissions sent
    Executed {
        command: CodeCommand,
        emissions: Vec<Emission>,
    },
    /// No phrase matched; closest known phrases, if any
    Unrecognized { suggestions: Vec<String> },
    /// Blank utterance
    Empty,
}

/// Ties the parser, the context and an injector together
pub struct CodeProcessor<I: Injector> {
    parser: CommandParser,
    context: DictationContext,
    injector: I,
}

impl<I: Injector> CodeProcessor<I> {
    pub fn new(parser: CommandParser, context: DictationContext, injector: I) -> Self {
        Self {
            parser,
            context,
            injector,
        }
    }

    /// Process one recognized utterance
    pub fn process(&mut self, utterance: &str) -> Result<ProcessResult, InjectError> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Ok(ProcessResult::Empty);
        }

        match self.parser.parse(utterance, self.context.language) {
            Some(command) => self.execute(command),
            None => {
                let suggestions = self.parser.suggest(utterance);
                debug!(utterance, ?suggestions, "Unrecognized");
                Ok(ProcessResult::Unrecognized { suggestions })
            }
        }
    }

    /// Run a command directly, bypassing recognition
    pub fn execute(&mut self, command: CodeCommand) -> Result<ProcessResult, InjectError> {
        let emissions = plan(&command, &mut self.context);
        debug!(?command, count = emissions.len(), "Executing");
        for emission in &emissions {
            self.injector.emit(emission)?;
        }
        Ok(ProcessResult::Executed { command, emissions })
    }

    pub fn language(&self) -> Language {
        self.context.language
    }

    /// Release the grammar; later utterances go unrecognized
    pub fn unload(&mut self) -> bool {
        self.parser.unload()
    }

    pub fn injector(&self) -> &I {
        &self.injector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coding::input::RecordingInjector;
    use crate::coding::keys::KeyPress;

    fn processor(language: Language) -> CodeProcessor<RecordingInjector> {
        CodeProcessor::new(
            CommandParser::new(&[]).unwrap(),
            DictationContext::new(language),
            RecordingInjector::new(),
        )
    }

    #[test]
    fn test_mode_switch_then_declare() {
        let mut p = processor(Language::Go);
        p.process("mode python").unwrap();
        assert_eq!(p.language(), Language::Python);

        p.process("new function do thing").unwrap();
        p.process("close function").unwrap();
        assert_eq!(p.injector().typed(), "def do_thing():\n");
    }

    #[test]
    fn test_go_close_function_moves_cursor() {
        let mut p = processor(Language::Go);
        let result = p.process("close func").unwrap();
        assert_eq!(
            result,
            ProcessResult::Executed {
                command: CodeCommand::CloseFunction,
                emissions: vec![
                    Emission::Text(") {\n\n".to_string()),
                    Emission::Keys(vec![KeyPress::Up, KeyPress::Tab]),
                ],
            }
        );
        assert_eq!(p.injector().emissions.len(), 2);
    }

    #[test]
    fn test_noop_in_go_mode() {
        let mut p = processor(Language::Go);
        let result = p.process("new class named widget").unwrap();
        assert!(matches!(
            result,
            ProcessResult::Executed { ref emissions, .. } if emissions.is_empty()
        ));
        assert!(p.injector().emissions.is_empty());
    }

    #[test]
    fn test_unrecognized_with_suggestion() {
        let mut p = processor(Language::Go);
        match p.process("print lion").unwrap() {
            ProcessResult::Unrecognized { suggestions } => {
                assert_eq!(suggestions[0], "print line");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_utterance() {
        let mut p = processor(Language::Go);
        assert_eq!(p.process("   ").unwrap(), ProcessResult::Empty);
    }

    #[test]
    fn test_unload_stops_recognition() {
        let mut p = processor(Language::Go);
        assert!(p.unload());
        assert!(!p.unload());
        assert!(matches!(
            p.process("null").unwrap(),
            ProcessResult::Unrecognized { .. }
        ));
    }
}
