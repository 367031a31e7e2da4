//! Candidate resolution, one resolver per remediation strategy.

use std::collections::HashSet;
use tower_lsp_server::ls_types::Diagnostic;
use yarn_core::{ActionKind, NameMatch};

use super::FixContext;
use super::assemble::{ProposedFix, assemble};
use super::classify::{CommandReference, Remediation};
use super::edits;

/// Upper bound on rename suggestions per diagnostic.
pub const MAX_SUGGESTIONS: usize = 10;

/// Produces the ordered fixes for one classified diagnostic.
pub fn resolve(
    ctx: &FixContext<'_>,
    diagnostic: &Diagnostic,
    remediation: &Remediation,
) -> Vec<ProposedFix> {
    match remediation {
        Remediation::MissingVariable(name) => missing_variable(ctx, diagnostic, name),
        Remediation::MissingCommand(reference) => missing_command(ctx, diagnostic, reference),
        Remediation::MissingJumpDestination(target) => missing_jump(ctx, diagnostic, target),
    }
}

fn missing_variable(ctx: &FixContext<'_>, diagnostic: &Diagnostic, name: &str) -> Vec<ProposedFix> {
    if name.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let renames = ctx
        .registries
        .iter()
        .flat_map(|registry| registry.find_variables(name, ctx.fuzzy()))
        .filter(|variable| variable.name != name)
        .filter(|variable| seen.insert(variable.name.clone()))
        .take(MAX_SUGGESTIONS)
        .map(|variable| ProposedFix::rename(ctx.uri, diagnostic.range, &variable.name))
        .collect();

    let implicit = ctx
        .registries
        .iter()
        .flat_map(|registry| registry.find_variables(name, NameMatch::Exact))
        .find(|variable| variable.is_implicit);

    let preferred = implicit.map(|symbol| {
        let info = ctx.inference.infer_declaration(&symbol);
        let terminator = ctx
            .registries
            .iter()
            .find_map(|registry| registry.document_buffer(ctx.uri))
            .map_or_else(|| "\n".to_string(), |buffer| buffer.line_terminator().to_string());

        let statement = edits::declaration_statement(name, &info, &terminator);
        ProposedFix::preferred(
            format!("Generate variable declaration '{}'", name),
            ctx.uri,
            edits::insert_at_line_start(diagnostic.range.start.line, statement),
        )
    });

    assemble(preferred, renames)
}

// Unlike variables and nodes, exact command matches are not filtered out.
fn missing_command(
    ctx: &FixContext<'_>,
    diagnostic: &Diagnostic,
    reference: &CommandReference,
) -> Vec<ProposedFix> {
    if reference.name.is_empty() {
        return Vec::new();
    }

    let renames = ctx
        .registries
        .iter()
        .flat_map(|registry| {
            registry.find_actions(&reference.name, ActionKind::Command, ctx.fuzzy())
        })
        .take(MAX_SUGGESTIONS)
        .map(|action| ProposedFix::rename(ctx.uri, diagnostic.range, &action.yarn_name))
        .collect();

    assemble(None, renames)
}

fn missing_jump(ctx: &FixContext<'_>, diagnostic: &Diagnostic, target: &str) -> Vec<ProposedFix> {
    if target.is_empty() {
        return Vec::new();
    }
    let Some(project) = ctx.registries.first() else {
        tracing::debug!("no project owns {}, skipping jump fixes", ctx.uri.as_str());
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let renames = project
        .find_nodes(target, ctx.fuzzy())
        .into_iter()
        .filter(|title| title != target)
        .filter(|title| seen.insert(title.clone()))
        .take(MAX_SUGGESTIONS)
        .map(|title| ProposedFix::rename(ctx.uri, diagnostic.range, &title))
        .collect();

    let preferred = project.document_buffer(ctx.uri).map(|buffer| {
        ProposedFix::preferred(
            format!("Generate node '{}'", target),
            ctx.uri,
            edits::append_lines(buffer.as_ref(), &edits::node_lines(target)),
        )
    });

    assemble(preferred, renames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfiguration;
    use std::sync::Arc;
    use tower_lsp_server::ls_types::{Position, Range, Uri};
    use yarn_core::{
        ActionDescriptor, DefaultDeclarationInference, EditableTextBuffer, SymbolDescriptor,
        SymbolRegistry, TextBuffer, YarnType,
    };

    #[derive(Default)]
    struct FakeRegistry {
        variables: Vec<SymbolDescriptor>,
        commands: Vec<ActionDescriptor>,
        nodes: Vec<String>,
        buffer: Option<Arc<TextBuffer>>,
    }

    impl SymbolRegistry for FakeRegistry {
        fn find_variables(&self, name: &str, matching: NameMatch) -> Vec<SymbolDescriptor> {
            matching.select(name, self.variables.iter().cloned(), |v| v.name.as_str())
        }

        fn find_actions(
            &self,
            name: &str,
            kind: ActionKind,
            matching: NameMatch,
        ) -> Vec<ActionDescriptor> {
            let of_kind = self.commands.iter().filter(|a| a.kind == kind).cloned();
            matching.select(name, of_kind, |a| a.yarn_name.as_str())
        }

        fn find_nodes(&self, name: &str, matching: NameMatch) -> Vec<String> {
            matching.select(name, self.nodes.iter().cloned(), |n| n.as_str())
        }

        fn document_buffer(&self, _uri: &Uri) -> Option<Arc<dyn EditableTextBuffer>> {
            self.buffer
                .clone()
                .map(|b| b as Arc<dyn EditableTextBuffer>)
        }
    }

    fn uri() -> Uri {
        "file:///project/story.yarn".parse().unwrap()
    }

    fn diagnostic_at(line: u32) -> Diagnostic {
        Diagnostic {
            range: Range::new(Position::new(line, 10), Position::new(line, 16)),
            ..Default::default()
        }
    }

    fn variable(name: &str, is_implicit: bool, yarn_type: YarnType) -> SymbolDescriptor {
        SymbolDescriptor {
            name: name.into(),
            is_implicit,
            yarn_type,
            default_value: None,
            source_uri: uri(),
            source_range: Range::default(),
        }
    }

    fn run(registries: Vec<Arc<dyn SymbolRegistry>>, remediation: Remediation) -> Vec<ProposedFix> {
        run_with(registries, remediation, EngineConfiguration::default())
    }

    fn run_with(
        registries: Vec<Arc<dyn SymbolRegistry>>,
        remediation: Remediation,
        config: EngineConfiguration,
    ) -> Vec<ProposedFix> {
        let uri = uri();
        let ctx = FixContext {
            uri: &uri,
            registries: &registries,
            inference: &DefaultDeclarationInference,
            config,
        };
        resolve(&ctx, &diagnostic_at(4), &remediation)
    }

    fn titles(fixes: &[ProposedFix]) -> Vec<&str> {
        fixes.iter().map(|f| f.title.as_str()).collect()
    }

    #[test]
    fn test_variable_declaration_preferred_first() {
        let registry = FakeRegistry {
            variables: vec![
                variable("$gold", true, YarnType::Number),
                variable("$golds", false, YarnType::Number),
            ],
            ..Default::default()
        };

        let fixes = run(
            vec![Arc::new(registry)],
            Remediation::MissingVariable("$gold".into()),
        );

        assert_eq!(
            titles(&fixes),
            vec!["Generate variable declaration '$gold'", "Rename to '$golds'"]
        );
        assert!(fixes[0].is_preferred);

        let edit = &fixes[0].edits[&uri()][0];
        assert_eq!(edit.range.start, Position::new(4, 0));
        assert_eq!(edit.range.end, Position::new(4, 0));
        assert_eq!(edit.new_text, "<<declare $gold = 0 as number>>\n");
    }

    #[test]
    fn test_variable_declaration_uses_inferred_type() {
        let registry = FakeRegistry {
            variables: vec![variable("$met_sam", true, YarnType::Bool)],
            ..Default::default()
        };

        let fixes = run(
            vec![Arc::new(registry)],
            Remediation::MissingVariable("$met_sam".into()),
        );

        assert_eq!(fixes.len(), 1);
        assert_eq!(
            fixes[0].edits[&uri()][0].new_text,
            "<<declare $met_sam = false as bool>>\n"
        );
    }

    #[test]
    fn test_variable_declaration_uses_buffer_terminator() {
        let registry = FakeRegistry {
            variables: vec![variable("$x", true, YarnType::Any)],
            buffer: Some(Arc::new(TextBuffer::new(
                "title: A\r\n---\r\n<<set $x to 1>>\r\n===\r\n",
            ))),
            ..Default::default()
        };

        let fixes = run(
            vec![Arc::new(registry)],
            Remediation::MissingVariable("$x".into()),
        );
        assert_eq!(
            fixes[0].edits[&uri()][0].new_text,
            "<<declare $x = 0 as number>>\r\n"
        );
    }

    #[test]
    fn test_variable_declaration_defaults_to_lf_without_buffer() {
        let registry = FakeRegistry {
            variables: vec![variable("$x", true, YarnType::Any)],
            buffer: None,
            ..Default::default()
        };

        let fixes = run(
            vec![Arc::new(registry)],
            Remediation::MissingVariable("$x".into()),
        );
        assert_eq!(
            fixes[0].edits[&uri()][0].new_text,
            "<<declare $x = 0 as number>>\n"
        );
    }

    #[test]
    fn test_variable_without_implicit_declaration_only_renames() {
        let registry = FakeRegistry {
            variables: vec![
                variable("$gold", false, YarnType::Number),
                variable("$golds", false, YarnType::Number),
            ],
            ..Default::default()
        };

        let fixes = run(
            vec![Arc::new(registry)],
            Remediation::MissingVariable("$gold".into()),
        );
        assert_eq!(titles(&fixes), vec!["Rename to '$golds'"]);
        assert!(fixes.iter().all(|f| !f.is_preferred));
    }

    #[test]
    fn test_variable_renames_deduplicated_across_projects() {
        let make = || FakeRegistry {
            variables: vec![variable("$coins", false, YarnType::Number)],
            ..Default::default()
        };

        let fixes = run(
            vec![Arc::new(make()), Arc::new(make())],
            Remediation::MissingVariable("$coin".into()),
        );
        assert_eq!(titles(&fixes), vec!["Rename to '$coins'"]);
    }

    #[test]
    fn test_variable_renames_capped() {
        let registry = FakeRegistry {
            variables: (0..30)
                .map(|i| variable(&format!("$inventory_count{}", i % 15), false, YarnType::Number))
                .collect(),
            ..Default::default()
        };

        let fixes = run(
            vec![Arc::new(registry)],
            Remediation::MissingVariable("$inventory_count".into()),
        );

        assert_eq!(fixes.len(), MAX_SUGGESTIONS);
        let unique: HashSet<_> = fixes.iter().map(|f| f.title.clone()).collect();
        assert_eq!(unique.len(), fixes.len());
    }

    #[test]
    fn test_strict_threshold_suppresses_renames() {
        let registry = FakeRegistry {
            variables: vec![variable("$golds", false, YarnType::Number)],
            ..Default::default()
        };

        let config = EngineConfiguration {
            fuzzy_match_threshold: 0.0,
            ..Default::default()
        };
        let fixes = run_with(
            vec![Arc::new(registry)],
            Remediation::MissingVariable("$gold".into()),
            config,
        );
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_command_rename() {
        let registry = FakeRegistry {
            commands: vec![
                ActionDescriptor::built_in("greet", ActionKind::Command),
                ActionDescriptor::built_in("great", ActionKind::Function),
            ],
            ..Default::default()
        };

        let fixes = run(
            vec![Arc::new(registry)],
            Remediation::MissingCommand(CommandReference {
                name: "gre3t".into(),
                is_command: true,
            }),
        );

        assert_eq!(titles(&fixes), vec!["Rename to 'greet'"]);
        let edit = &fixes[0].edits[&uri()][0];
        assert_eq!(edit.range, diagnostic_at(4).range);
        assert_eq!(edit.new_text, "greet");
    }

    #[test]
    fn test_command_exact_match_not_excluded() {
        let registry = FakeRegistry {
            commands: vec![ActionDescriptor::built_in("wait", ActionKind::Command)],
            ..Default::default()
        };

        let fixes = run(
            vec![Arc::new(registry)],
            Remediation::MissingCommand(CommandReference {
                name: "wait".into(),
                is_command: true,
            }),
        );
        assert_eq!(titles(&fixes), vec!["Rename to 'wait'"]);
    }

    #[test]
    fn test_jump_generates_node_after_trailing_newline() {
        let registry = FakeRegistry {
            nodes: vec!["Start".into(), "Market".into()],
            buffer: Some(Arc::new(TextBuffer::new("title: Start\n---\n<<jump Markt>>\n===\n"))),
            ..Default::default()
        };

        let fixes = run(
            vec![Arc::new(registry)],
            Remediation::MissingJumpDestination("Markt".into()),
        );

        assert_eq!(titles(&fixes), vec!["Generate node 'Markt'", "Rename to 'Market'"]);
        assert!(fixes[0].is_preferred);
        let edit = &fixes[0].edits[&uri()][0];
        assert_eq!(edit.range.start, Position::new(4, 0));
        assert_eq!(edit.new_text, "title: Markt\n---\n\n===\n");
    }

    #[test]
    fn test_jump_generates_node_without_trailing_newline() {
        let registry = FakeRegistry {
            buffer: Some(Arc::new(TextBuffer::new("title: A\n---\n==="))),
            ..Default::default()
        };

        let fixes = run(
            vec![Arc::new(registry)],
            Remediation::MissingJumpDestination("B".into()),
        );

        assert_eq!(fixes.len(), 1);
        let edit = &fixes[0].edits[&uri()][0];
        assert_eq!(edit.range.start, Position::new(2, 3));
        assert_eq!(edit.new_text, "\ntitle: B\n---\n\n===\n");
    }

    #[test]
    fn test_jump_excludes_exact_title() {
        let registry = FakeRegistry {
            nodes: vec!["Shop".into(), "Shop".into()],
            ..Default::default()
        };

        let fixes = run(
            vec![Arc::new(registry)],
            Remediation::MissingJumpDestination("Shop".into()),
        );
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_jump_without_project() {
        let fixes = run(vec![], Remediation::MissingJumpDestination("Shop".into()));
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_jump_uses_first_project_only() {
        let first = FakeRegistry::default();
        let second = FakeRegistry {
            nodes: vec!["Shops".into()],
            ..Default::default()
        };

        let fixes = run(
            vec![Arc::new(first), Arc::new(second)],
            Remediation::MissingJumpDestination("Shop".into()),
        );
        assert!(fixes.is_empty());
    }
}
