//! Compile and link environment accumulated by toolchain layers.

use serde::Serialize;

/// Preprocessor definitions with set semantics and stable insertion order.
///
/// Command lines built from the set are reproducible across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DefinitionSet {
    items: Vec<String>,
}

impl DefinitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition. Returns `false` if it was already present.
    pub fn insert(&mut self, definition: impl Into<String>) -> bool {
        let definition = definition.into();
        if self.contains(&definition) {
            return false;
        }
        self.items.push(definition);
        true
    }

    pub fn contains(&self, definition: &str) -> bool {
        self.items.iter().any(|d| d == definition)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render as `-D<name>` compiler flags.
    pub fn to_flags(&self) -> Vec<String> {
        self.items.iter().map(|d| format!("-D{d}")).collect()
    }
}

/// Compiler-side state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompileEnvironment {
    pub preprocessor_definitions: DefinitionSet,
}

/// Linker-side state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LinkEnvironment {
    /// Libraries and frameworks in link order. Not deduplicated.
    pub input_libraries: Vec<String>,
}

impl LinkEnvironment {
    /// Render input libraries as linker flags.
    ///
    /// `Foo.framework` becomes `-framework Foo`; everything else `-l<name>`.
    pub fn to_flags(&self) -> Vec<String> {
        let mut flags = Vec::with_capacity(self.input_libraries.len() * 2);
        for lib in &self.input_libraries {
            match lib.strip_suffix(".framework") {
                Some(framework) => {
                    flags.push("-framework".to_string());
                    flags.push(framework.to_string());
                }
                None => flags.push(format!("-l{lib}")),
            }
        }
        flags
    }
}

/// Everything toolchain layers contribute for one build invocation.
///
/// Owned by the invocation that created it and dropped once its
/// compile/link step completes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolchainEnvironment {
    pub compile: CompileEnvironment,
    pub link: LinkEnvironment,
    /// Extra command-line fragments, in order.
    pub extra_args: Vec<String>,
}

impl ToolchainEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, definition: impl Into<String>) {
        self.compile.preprocessor_definitions.insert(definition);
    }

    pub fn link_library(&mut self, library: impl Into<String>) {
        self.link.input_libraries.push(library.into());
    }
}
