//! Resolves `typing` aliases introduced by the import prologue so the
//! schema walker can recognize `Optional`, `Union`, `Literal`, … regardless
//! of how the source imported them.

use std::collections::HashMap;

use crate::ast::ImportStmt;

/// Maps aliases back to their canonical `typing` construct name.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    /// Local name the `typing` module itself is bound to, from
    /// `import typing as X` (or `"typing"` if imported unaliased).
    typing_module_alias: Option<String>,
    /// Local name → canonical `typing` name, from
    /// `from typing import Optional as O`.
    typing_names: HashMap<String, String>,
}

impl AliasMap {
    /// Builds an alias map from a module's import prologue.
    #[must_use]
    pub fn from_imports(imports: &[ImportStmt]) -> Self {
        let mut map = Self::default();
        for import in imports {
            match import {
                ImportStmt::Import(names) => {
                    for (module, alias) in names {
                        if module == "typing" {
                            map.typing_module_alias = Some(alias.clone().unwrap_or_else(|| module.clone()));
                        }
                    }
                }
                ImportStmt::From { module, names } => {
                    if module == "typing" {
                        for (name, alias) in names {
                            let local = alias.clone().unwrap_or_else(|| name.clone());
                            map.typing_names.insert(local, name.clone());
                        }
                    }
                }
            }
        }
        map
    }

    /// Resolves a possibly dotted, possibly aliased annotation name down to
    /// its canonical form — `"int"`, `"list"`, `"Optional"`, etc. Names with
    /// no applicable alias pass through unchanged.
    #[must_use]
    pub fn resolve(&self, name: &str) -> String {
        if let Some((head, leaf)) = name.rsplit_once('.') {
            let head_is_typing =
                self.typing_module_alias.as_deref() == Some(head) || head == "typing";
            if head_is_typing {
                return leaf.to_owned();
            }
            return leaf.to_owned();
        }
        self.typing_names.get(name).cloned().unwrap_or_else(|| name.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn imports_of(source: &str) -> Vec<ImportStmt> {
        let tokens = tokenize(source).expect("tokenize");
        parse(&tokens).expect("parse").imports
    }

    #[test]
    fn resolves_from_import_alias() {
        let imports = imports_of("from typing import Optional as O\ndef f(x: O[int]):\n    pass\n");
        let map = AliasMap::from_imports(&imports);
        assert_eq!(map.resolve("O"), "Optional");
    }

    #[test]
    fn resolves_module_alias_dotted_access() {
        let imports = imports_of("import typing as t\ndef f(x: t.Optional[int]):\n    pass\n");
        let map = AliasMap::from_imports(&imports);
        assert_eq!(map.resolve("t.Optional"), "Optional");
    }

    #[test]
    fn passes_through_unaliased_names() {
        let map = AliasMap::default();
        assert_eq!(map.resolve("int"), "int");
    }
}
