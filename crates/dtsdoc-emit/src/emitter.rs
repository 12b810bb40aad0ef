use dtsdoc_ast::{DtsItem, PrintConfig, print_items};
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::doclet::Doclet;
use crate::error::EmitError;
use crate::options::EmitOptions;
use crate::synth::Synthesizer;
use crate::tree::DocletTree;

/// Turns doclets into printed `.d.ts` text.
#[derive(Debug)]
pub struct Emitter<'o> {
    options: &'o EmitOptions,
    config: PrintConfig,
    results: Vec<DtsItem>,
}

impl<'o> Emitter<'o> {
    pub fn new(options: &'o EmitOptions) -> Self {
        Self {
            options,
            config: PrintConfig::default(),
            results: Vec::new(),
        }
    }

    pub fn with_print_config(mut self, config: PrintConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the tree and synthesize its declarations, replacing the results
    /// of any previous call.
    pub fn parse(&mut self, docs: &[Doclet], diags: &mut Diagnostics) -> Result<(), EmitError> {
        self.results.clear();
        let tree = DocletTree::build(docs, self.options, diags);
        debug!(roots = tree.roots().len(), nodes = tree.len(), "built doclet tree");
        self.results = Synthesizer::new(&tree, diags).synthesize()?;
        Ok(())
    }

    pub fn results(&self) -> &[DtsItem] {
        &self.results
    }

    /// Print the declarations, each followed by a blank line.
    pub fn emit(&self) -> String {
        print_items(&self.results, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doclet::DocletKind;

    #[test]
    fn test_parse_replaces_previous_results() {
        let options = EmitOptions::default();
        let mut diags = Diagnostics::new();
        let mut emitter = Emitter::new(&options);

        emitter
            .parse(&[Doclet::new(DocletKind::Function, "a", "a")], &mut diags)
            .unwrap();
        assert_eq!(emitter.results().len(), 1);

        emitter
            .parse(&[Doclet::new(DocletKind::Function, "b", "b")], &mut diags)
            .unwrap();
        assert_eq!(emitter.results().len(), 1);
        assert_eq!(emitter.results()[0].name(), "b");
    }

    #[test]
    fn test_emit_with_tabs() {
        let options = EmitOptions::default();
        let mut diags = Diagnostics::new();
        let class = Doclet::new(DocletKind::Class, "Foo", "Foo");
        let mut method = Doclet::new(DocletKind::Function, "bar", "Foo#bar");
        method.memberof = Some("Foo".to_string());

        let mut emitter = Emitter::new(&options).with_print_config(PrintConfig::default().with_tabs());
        emitter.parse(&[class, method], &mut diags).unwrap();
        let output = emitter.emit();
        assert!(output.contains("\n\tbar(): void;\n"), "output:\n{output}");
    }
}
