//! Keyword classification and template registry
//!
//! Classification is data-driven. Statement and block keywords have an
//! authored record (snippet template, detail line, markdown documentation).
//! Data types, operators and boolean constants are recognized by name and
//! inserted verbatim. Every other keyword falls back to [`KeywordCategory::Generic`],
//! so a keyword added to the grammar always gets an entry.
//!
//! The lookup table is built once, on first use, and is read-only afterwards.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use tracing::error;

use super::entry::{Documentation, EntryKind, InsertTemplate};
use super::snippet::Snippet;

/// Semantic classification of a keyword. Exactly one per keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    ControlFlow,
    Declaration,
    IOStatement,
    FileOperation,
    DataType,
    Operator,
    BooleanConstant,
    Generic,
}

/// Everything the catalog needs to know about a keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSpec {
    pub category: KeywordCategory,
    pub kind: EntryKind,
    pub insert: InsertTemplate,
    pub detail: String,
    pub documentation: Documentation,
}

/// Authored record as written in the table below.
struct AuthoredKeyword {
    label: &'static str,
    category: KeywordCategory,
    kind: EntryKind,
    template: &'static str,
    detail: &'static str,
    documentation: &'static str,
}

/// Keywords classified by name alone.
struct NamedClass {
    names: &'static [&'static str],
    category: KeywordCategory,
    kind: EntryKind,
    detail: &'static str,
    documentation: &'static str,
}

const GENERIC_DETAIL: &str = "Cambridge Pseudocode keyword.";
const GENERIC_DOCUMENTATION: &str = "A reserved word of Cambridge Pseudocode.";

const NAMED_CLASSES: &[NamedClass] = &[
    NamedClass {
        names: &["INTEGER", "REAL", "BOOLEAN", "CHAR", "STRING", "ARRAY"],
        category: KeywordCategory::DataType,
        kind: EntryKind::TypeParameter,
        detail: "Cambridge Pseudocode datatype keyword.",
        documentation: "Represents the internal storage properties of a variable or similar.",
    },
    NamedClass {
        names: &["AND", "OR", "DIV", "MOD", "NOT"],
        category: KeywordCategory::Operator,
        kind: EntryKind::Operator,
        detail: "Cambridge Pseudocode operation keyword.",
        documentation: "Applies the corresponding operation.",
    },
    NamedClass {
        names: &["TRUE", "FALSE"],
        category: KeywordCategory::BooleanConstant,
        kind: EntryKind::Constant,
        detail: "Cambridge Pseudocode boolean constant keyword.",
        documentation: "Represents the corresponding boolean value.",
    },
];

const AUTHORED: &[AuthoredKeyword] = &[
    // Declarations
    AuthoredKeyword {
        label: "FUNCTION",
        category: KeywordCategory::Declaration,
        kind: EntryKind::Function,
        template: "FUNCTION ${1:functionName}(${2:param1:TYPE}) RETURNS ${3:RETURNTYPE}\n\t$0\nENDFUNCTION",
        detail: "Cambridge Pseudocode function declaration.",
        documentation: "Declares a piece of code that can be reused and that returns a value of a given \
datatype. Can be called via expression:\n\
```pseudocode\n\
functionName(arguments)\n\
```",
    },
    AuthoredKeyword {
        label: "PROCEDURE",
        category: KeywordCategory::Declaration,
        kind: EntryKind::Function,
        template: "PROCEDURE ${1:procedureName}(${2:param1:TYPE})\n\t$0\nENDPROCEDURE",
        detail: "Cambridge Pseudocode procedure declaration.",
        documentation: "Declares a piece of code that can be reused. Can be called via:\n\
```pseudocode\n\
CALL procedureName(arguments)\n\
```",
    },
    AuthoredKeyword {
        label: "DECLARE",
        category: KeywordCategory::Declaration,
        kind: EntryKind::Keyword,
        template: "DECLARE ${1:identifier} : ${2:TYPE}$0",
        detail: "Cambridge Pseudocode variable declaration.",
        documentation: "Declares a variable of the given datatype:\n\
```pseudocode\n\
DECLARE identifier : TYPE\n\
```\n\
Arrays are declared with their bounds:\n\
```pseudocode\n\
DECLARE identifier : ARRAY[lower:upper] OF TYPE\n\
```",
    },
    AuthoredKeyword {
        label: "CONSTANT",
        category: KeywordCategory::Declaration,
        kind: EntryKind::Keyword,
        template: "CONSTANT ${1:identifier} = ${2:value}$0",
        detail: "Cambridge Pseudocode constant declaration.",
        documentation: "Declares a named value that cannot change:\n\
```pseudocode\n\
CONSTANT identifier = value\n\
```",
    },
    AuthoredKeyword {
        label: "TYPE",
        category: KeywordCategory::Declaration,
        kind: EntryKind::Keyword,
        template: "TYPE ${1:typeName}\n\tDECLARE ${2:field} : ${3:TYPE}\n\t$0\nENDTYPE",
        detail: "Cambridge Pseudocode composite type declaration.",
        documentation: "Declares a record type made of named fields:\n\
```pseudocode\n\
TYPE typeName\n\
\tDECLARE field1 : TYPE\n\
\tDECLARE field2 : TYPE\n\
ENDTYPE\n\
```",
    },
    // Control flow
    AuthoredKeyword {
        label: "IF",
        category: KeywordCategory::ControlFlow,
        kind: EntryKind::Keyword,
        template: "IF ${1:condition} THEN\n\t$0\nENDIF",
        detail: "Cambridge Pseudocode if condition block.",
        documentation: "Branches the execution depending on if a condition is met.\n\
Can be of the form:\n\
\n\
```pseudocode\n\
IF condition THEN\n\
\tbody\n\
ENDIF\n\
```\n\
\n\
But can also be extended with an else branch:\n\
\n\
```pseudocode\n\
IF condition THEN\n\
\tthenBody\n\
ELSE\n\
\telseBody\n\
ENDIF\n\
```",
    },
    AuthoredKeyword {
        label: "ELSE",
        category: KeywordCategory::ControlFlow,
        kind: EntryKind::Keyword,
        template: "ELSE\n\t$0",
        detail: "Cambridge Pseudocode else condition branch.",
        documentation: "Allows for an else body inside an IF statement. Must be used in the following way:\n\
```pseudocode\n\
IF condition THEN\n\
\tthenBody\n\
ELSE\n\
\telseBody\n\
ENDIF\n\
```",
    },
    AuthoredKeyword {
        label: "CASE",
        category: KeywordCategory::ControlFlow,
        kind: EntryKind::Keyword,
        template: "CASE ${1:expression} OF\n\t$2\n\tOTHERWISE:\n\t\t$3\nENDCASE",
        detail: "Cambridge Pseudocode case statement.",
        documentation: "Branches the execution based on the value of the given expression. Only works on \
INTEGER and CHAR types. Requires an OTHERWISE branch and has the form:\n\
```pseudocode\n\
CASE expression OF\n\
\tvalue1:\n\
\t\tbody1\n\
\t...\n\
\tOTHERWISE:\n\
\t\totherwiseBody\n\
ENDCASE\n\
```",
    },
    AuthoredKeyword {
        label: "OTHERWISE",
        category: KeywordCategory::ControlFlow,
        kind: EntryKind::Keyword,
        template: "OTHERWISE:\n\t$0",
        detail: "Cambridge Pseudocode OTHERWISE keyword.",
        documentation: "Marks the execution path in case no label matches the value of the expression in a \
CASE statement as:\n\
```pseudocode\n\
OTHERWISE:\n\
\totherwiseBody\n\
```",
    },
    AuthoredKeyword {
        label: "FOR",
        category: KeywordCategory::ControlFlow,
        kind: EntryKind::Keyword,
        template: "FOR ${1:counterName} <- ${2:init} TO ${3:end}\n\t$0\nNEXT ${1:counterName}",
        detail: "Cambridge Pseudocode for statement.",
        documentation: "Takes the form:\n\
```pseudocode\n\
FOR counterName <- init TO end\n\
\tbody\n\
NEXT counterName\n\
```\n\
Where `counterName` is a variable that represents the iteration number that goes from `init` \
to `end` incrementing the counter by 1.\n\
\n\
It can also take the form:\n\
```pseudocode\n\
FOR counterName <- init TO end STEP stepAmount\n\
\tbody\n\
NEXT counterName\n\
```\n\
Such that the counter will be incremented by the specified amount each iteration.",
    },
    AuthoredKeyword {
        label: "STEP",
        category: KeywordCategory::ControlFlow,
        kind: EntryKind::Keyword,
        template: "STEP ${1:stepAmount}",
        detail: "Cambridge Pseudocode STEP keyword.",
        documentation: "Allows for different step values to be implemented in for loops by adding\n\
```pseudocode\n\
STEP stepAmount\n\
```\n\
at the end of the loop header.",
    },
    AuthoredKeyword {
        label: "WHILE",
        category: KeywordCategory::ControlFlow,
        kind: EntryKind::Keyword,
        template: "WHILE ${1:condition} DO\n\t$0\nENDWHILE",
        detail: "Cambridge Pseudocode while loop.",
        documentation: "Takes the form\n\
```pseudocode\n\
WHILE condition DO\n\
\tbody\n\
ENDWHILE\n\
```\n\
Repeats the body as long as the condition is met, results in TRUE. It is a pre-condition loop, \
which means the condition is checked before execution of the body.",
    },
    AuthoredKeyword {
        label: "REPEAT",
        category: KeywordCategory::ControlFlow,
        kind: EntryKind::Keyword,
        template: "REPEAT\n\t$0\nUNTIL ${1:condition}",
        detail: "Cambridge Pseudocode repeat until loop.",
        documentation: "Takes the form\n\
```pseudocode\n\
REPEAT\n\
\tbody\n\
UNTIL condition\n\
```\n\
Repeats the body as long as the condition is NOT met, or results in FALSE. It is a post-condition \
loop, which means the condition is checked after execution of the body.",
    },
    AuthoredKeyword {
        label: "RETURN",
        category: KeywordCategory::ControlFlow,
        kind: EntryKind::Keyword,
        template: "RETURN $0",
        detail: "Cambridge Pseudocode return statement.",
        documentation: "```pseudocode\n\
RETURN expression\n\
```\n\
Returns the result value of the expression from a function.",
    },
    AuthoredKeyword {
        label: "CALL",
        category: KeywordCategory::ControlFlow,
        kind: EntryKind::Keyword,
        template: "CALL ${1:procedureName}(${2:params})",
        detail: "Cambridge Pseudocode call statement.",
        documentation: "Takes the form\n\
```pseudocode\n\
CALL procedureName(parameters)\n\
```\n\
Calls a procedure and executes its body.",
    },
    // Input / output
    AuthoredKeyword {
        label: "INPUT",
        category: KeywordCategory::IOStatement,
        kind: EntryKind::Keyword,
        template: "INPUT $0",
        detail: "Cambridge Pseudocode input statement.",
        documentation: "```pseudocode\n\
INPUT target\n\
```\n\
Inputs a value of the same type as the target container and stores it in target.",
    },
    AuthoredKeyword {
        label: "OUTPUT",
        category: KeywordCategory::IOStatement,
        kind: EntryKind::Keyword,
        template: "OUTPUT $0",
        detail: "Cambridge Pseudocode output statement.",
        documentation: "```pseudocode\n\
OUTPUT expressions\n\
```\n\
Outputs a comma-separated list of expressions, formatting each one depending on its data type.",
    },
    // Files
    AuthoredKeyword {
        label: "OPENFILE",
        category: KeywordCategory::FileOperation,
        kind: EntryKind::File,
        template: "OPENFILE \"${1:filename}\" FOR ${2:accessType}",
        detail: "Cambridge Pseudocode file open statement.",
        documentation: "Takes the form\n\
```pseudocode\n\
OPENFILE \"filename\" FOR accessType\n\
```\n\
where access type is either `READ`, `WRITE` or `APPEND`.\n\
Opens the file at the specified path for the given operation.",
    },
    AuthoredKeyword {
        label: "CLOSEFILE",
        category: KeywordCategory::FileOperation,
        kind: EntryKind::File,
        template: "CLOSEFILE \"${1:filename}\"",
        detail: "Cambridge Pseudocode file close statement.",
        documentation: "Takes the form\n\
```pseudocode\n\
CLOSEFILE \"filename\"\n\
```\n\
Closes the file at the given path.",
    },
    AuthoredKeyword {
        label: "READFILE",
        category: KeywordCategory::FileOperation,
        kind: EntryKind::Keyword,
        template: "READFILE \"${1:filename}\", ${2:target}",
        detail: "Cambridge Pseudocode read file statement.",
        documentation: "Takes the form\n\
```pseudocode\n\
READFILE \"filename\", target\n\
```\n\
Reads a value of the same datatype as the target container from the specified file and stores \
it in target.",
    },
    AuthoredKeyword {
        label: "WRITEFILE",
        category: KeywordCategory::FileOperation,
        kind: EntryKind::Keyword,
        template: "WRITEFILE \"${1:filename}\", ${2:expressions}",
        detail: "Cambridge Pseudocode write file statement.",
        documentation: "Takes the form\n\
```pseudocode\n\
WRITEFILE \"filename\", expressions\n\
```\n\
Writes or appends a list of comma-separated expressions, formatting each of them depending on \
their datatype.",
    },
];

static REGISTRY: Lazy<KeywordRegistry> = Lazy::new(KeywordRegistry::build);

/// Process-wide registry instance.
pub fn registry() -> &'static KeywordRegistry {
    &REGISTRY
}

/// Classifies a keyword using the process-wide registry.
pub fn classify(keyword: &str) -> KeywordSpec {
    registry().classify(keyword)
}

/// Lookup table from keyword name to its spec.
#[derive(Debug)]
pub struct KeywordRegistry {
    specs: FxHashMap<&'static str, KeywordSpec>,
}

impl KeywordRegistry {
    fn build() -> Self {
        let mut specs = FxHashMap::default();

        for class in NAMED_CLASSES {
            for name in class.names {
                specs.insert(*name, KeywordSpec {
                    category: class.category,
                    kind: class.kind,
                    insert: InsertTemplate::Plain,
                    detail: class.detail.to_string(),
                    documentation: Documentation::Plain(class.documentation.to_string()),
                });
            }
        }

        for authored in AUTHORED {
            let insert = match Snippet::parse(authored.template) {
                Ok(snippet) => InsertTemplate::Snippet(snippet),
                Err(e) => {
                    error!("Invalid template for keyword {}: {}", authored.label, e);
                    InsertTemplate::Plain
                }
            };

            specs.insert(authored.label, KeywordSpec {
                category: authored.category,
                kind: authored.kind,
                insert,
                detail: authored.detail.to_string(),
                documentation: Documentation::Markdown(authored.documentation.to_string()),
            });
        }

        Self { specs }
    }

    /// Returns the registered spec, or the generic fallback for unknown
    /// keywords. Matching is case-sensitive.
    pub fn classify(&self, keyword: &str) -> KeywordSpec {
        self.specs
            .get(keyword)
            .cloned()
            .unwrap_or_else(generic_spec)
    }

    pub fn is_registered(&self, keyword: &str) -> bool {
        self.specs.contains_key(keyword)
    }

    /// All keywords with a bespoke or name-based classification.
    pub fn registered_keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.keys().copied()
    }
}

fn generic_spec() -> KeywordSpec {
    KeywordSpec {
        category: KeywordCategory::Generic,
        kind: EntryKind::Keyword,
        insert: InsertTemplate::Plain,
        detail: GENERIC_DETAIL.to_string(),
        documentation: Documentation::Plain(GENERIC_DOCUMENTATION.to_string()),
    }
}
