//! Workspace and project model.
//!
//! A workspace holds one project per workspace folder, or a single root-less
//! project when the client sent none. A document belongs to every project
//! whose root contains it. Projects keep the latest analysis of each script
//! and definitions file and answer symbol queries from those snapshots.

pub mod loader;
pub mod scanner;

pub use loader::{discover_project_files, is_project_file, load_document_from_disk};
pub use scanner::{NamedReference, NodeInfo, VariableUse, YarnDocument, scan_document};

use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tower_lsp_server::ls_types::Uri;
use yarn_core::{
    ActionDescriptor, ActionKind, EditableTextBuffer, NameMatch, Result, StringTableEntry,
    SymbolDescriptor, SymbolRegistry, YarnType, built_in_actions, is_definitions_uri,
    parse_definitions,
};

/// A set of Yarn scripts and command definitions analyzed together.
pub struct Project {
    root: Option<Uri>,
    documents: DashMap<Uri, Arc<YarnDocument>>,
    definitions: DashMap<Uri, Vec<ActionDescriptor>>,
    built_ins: Vec<ActionDescriptor>,
}

impl Project {
    /// Creates an empty project. A project without a root owns every URI.
    pub fn new(root: Option<Uri>) -> Self {
        Self {
            root,
            documents: DashMap::new(),
            definitions: DashMap::new(),
            built_ins: built_in_actions(),
        }
    }

    pub fn root(&self) -> Option<&Uri> {
        self.root.as_ref()
    }

    /// Whether `uri` lies under this project's root.
    pub fn owns(&self, uri: &Uri) -> bool {
        let Some(root) = &self.root else {
            return true;
        };
        let prefix = root.as_str().trim_end_matches('/');
        uri.as_str()
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    pub fn set_document(&self, uri: Uri, document: Arc<YarnDocument>) {
        self.documents.insert(uri, document);
    }

    pub fn set_definitions(&self, uri: Uri, actions: Vec<ActionDescriptor>) {
        self.definitions.insert(uri, actions);
    }

    pub fn remove_document(&self, uri: &Uri) {
        self.documents.remove(uri);
        self.definitions.remove(uri);
    }

    pub fn document(&self, uri: &Uri) -> Option<Arc<YarnDocument>> {
        self.documents.get(uri).map(|doc| Arc::clone(doc.value()))
    }

    pub fn document_count(&self) -> usize {
        self.documents.len() + self.definitions.len()
    }

    /// Script documents ordered by URI.
    pub fn documents(&self) -> Vec<(Uri, Arc<YarnDocument>)> {
        let mut documents: Vec<_> = self
            .documents
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        documents.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        documents
    }

    /// Titles of every node in the project.
    pub fn node_titles(&self) -> Vec<String> {
        self.documents()
            .into_iter()
            .flat_map(|(_, doc)| doc.nodes.iter().map(|n| n.title.clone()).collect::<Vec<_>>())
            .collect()
    }

    /// Explicitly declared variables followed by implicit ones.
    pub fn variables(&self) -> Vec<SymbolDescriptor> {
        let documents = self.documents();

        let declared: Vec<SymbolDescriptor> = documents
            .iter()
            .flat_map(|(_, doc)| doc.declarations.iter().cloned())
            .collect();
        let declared_names: HashSet<&str> = declared.iter().map(|d| d.name.as_str()).collect();

        let mut implicit: Vec<SymbolDescriptor> = Vec::new();
        let mut implicit_index: HashMap<&str, usize> = HashMap::new();
        for (uri, doc) in &documents {
            for usage in &doc.variable_uses {
                if declared_names.contains(usage.name.as_str()) {
                    continue;
                }
                match implicit_index.get(usage.name.as_str()) {
                    Some(&index) => {
                        let existing = &mut implicit[index];
                        if existing.yarn_type == YarnType::Any
                            && let Some(assigned) = usage.assigned_type
                        {
                            existing.yarn_type = assigned;
                        }
                    }
                    None => {
                        implicit_index.insert(usage.name.as_str(), implicit.len());
                        implicit.push(SymbolDescriptor {
                            name: usage.name.clone(),
                            is_implicit: true,
                            yarn_type: usage.assigned_type.unwrap_or_default(),
                            default_value: None,
                            source_uri: uri.clone(),
                            source_range: usage.range,
                        });
                    }
                }
            }
        }

        declared.into_iter().chain(implicit).collect()
    }

    /// Registered actions of `kind`, one per Yarn name.
    ///
    /// When several definitions share a name the one with the lowest priority
    /// wins, so definitions files override built-ins.
    pub fn actions(&self, kind: ActionKind) -> Vec<ActionDescriptor> {
        let mut definitions: Vec<_> = self
            .definitions
            .iter()
            .map(|entry| (entry.key().as_str().to_string(), entry.value().clone()))
            .collect();
        definitions.sort_by(|a, b| a.0.cmp(&b.0));

        let candidates = self
            .built_ins
            .iter()
            .cloned()
            .chain(definitions.into_iter().flat_map(|(_, actions)| actions))
            .filter(|action| action.kind == kind);

        let mut winners: Vec<ActionDescriptor> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for action in candidates {
            match index.get(&action.yarn_name) {
                Some(&i) if action.priority < winners[i].priority => winners[i] = action,
                Some(_) => {}
                None => {
                    index.insert(action.yarn_name.clone(), winners.len());
                    winners.push(action);
                }
            }
        }
        winners
    }

    /// String table of one script, in line order.
    pub fn string_table(&self, uri: &Uri) -> Option<Vec<StringTableEntry>> {
        self.document(uri).map(|doc| doc.string_table.clone())
    }
}

impl SymbolRegistry for Project {
    fn find_variables(&self, name: &str, matching: NameMatch) -> Vec<SymbolDescriptor> {
        matching.select(name, self.variables(), |v| v.name.as_str())
    }

    fn find_actions(
        &self,
        name: &str,
        kind: ActionKind,
        matching: NameMatch,
    ) -> Vec<ActionDescriptor> {
        matching.select(name, self.actions(kind), |a| a.yarn_name.as_str())
    }

    fn find_nodes(&self, name: &str, matching: NameMatch) -> Vec<String> {
        matching.select(name, self.node_titles(), |title| title.as_str())
    }

    fn document_buffer(&self, uri: &Uri) -> Option<Arc<dyn EditableTextBuffer>> {
        self.document(uri)
            .map(|doc| Arc::clone(&doc.buffer) as Arc<dyn EditableTextBuffer>)
    }
}

/// All projects known to the server.
pub struct Workspace {
    projects: DashMap<String, Arc<Project>>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Creates a workspace with a single root-less project.
    pub fn new() -> Self {
        let projects = DashMap::new();
        projects.insert(String::new(), Arc::new(Project::new(None)));
        Self { projects }
    }

    /// Replaces all projects with one per root. No roots means one root-less
    /// project.
    pub fn configure_roots(&self, roots: Vec<Uri>) {
        self.projects.clear();
        if roots.is_empty() {
            self.projects
                .insert(String::new(), Arc::new(Project::new(None)));
            return;
        }
        for root in roots {
            tracing::info!("adding project at {}", root.as_str());
            self.projects
                .insert(root.as_str().to_string(), Arc::new(Project::new(Some(root))));
        }
    }

    pub fn projects(&self) -> Vec<Arc<Project>> {
        let mut projects: Vec<_> = self
            .projects
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        projects.sort_by(|a, b| a.0.cmp(&b.0));
        projects.into_iter().map(|(_, project)| project).collect()
    }

    /// Projects that own `uri`, ordered by root.
    pub fn projects_for_uri(&self, uri: &Uri) -> Vec<Arc<Project>> {
        self.projects()
            .into_iter()
            .filter(|project| project.owns(uri))
            .collect()
    }

    pub fn registries_for_uri(&self, uri: &Uri) -> Vec<Arc<dyn SymbolRegistry>> {
        self.projects_for_uri(uri)
            .into_iter()
            .map(|project| project as Arc<dyn SymbolRegistry>)
            .collect()
    }

    /// Re-analyzes `uri` in every project that owns it.
    ///
    /// # Errors
    ///
    /// Returns an error when a definitions file cannot be parsed. Projects
    /// keep the previous definitions from that file.
    pub fn update_document(&self, uri: &Uri, content: &str) -> Result<()> {
        let owners = self.projects_for_uri(uri);
        if owners.is_empty() {
            tracing::debug!("no project owns {}", uri.as_str());
            return Ok(());
        }

        if is_definitions_uri(uri) {
            let actions = parse_definitions(content, uri)?;
            for project in &owners {
                project.set_definitions(uri.clone(), actions.clone());
            }
        } else {
            let document = Arc::new(scan_document(uri, content));
            for project in &owners {
                project.set_document(uri.clone(), Arc::clone(&document));
            }
        }
        Ok(())
    }

    pub fn remove_document(&self, uri: &Uri) {
        for project in self.projects_for_uri(uri) {
            project.remove_document(uri);
        }
    }

    pub fn document(&self, uri: &Uri) -> Option<Arc<YarnDocument>> {
        self.projects_for_uri(uri)
            .iter()
            .find_map(|project| project.document(uri))
    }

    /// Loads every project file under each project root.
    ///
    /// Files that cannot be read or analyzed are logged and skipped.
    pub async fn load_from_disk(&self) {
        for project in self.projects() {
            let Some(root) = project.root().and_then(|r| r.to_file_path()) else {
                continue;
            };

            for path in discover_project_files(&root).await {
                let Some(uri) = Uri::from_file_path(&path) else {
                    continue;
                };
                let content = match load_document_from_disk(&uri).await {
                    Ok(content) => content,
                    Err(e) => {
                        tracing::warn!("failed to load {}: {}", uri.as_str(), e);
                        continue;
                    }
                };
                if let Err(e) = self.update_document(&uri, &content) {
                    tracing::warn!("failed to analyze {}: {}", uri.as_str(), e);
                }
            }

            tracing::info!(
                "project {:?} loaded with {} files",
                project.root().map(|u| u.as_str()),
                project.document_count()
            );
        }
    }
}
