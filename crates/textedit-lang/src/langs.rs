//! Built-in language definitions.
//!
//! Each constructor returns an owned [`LanguageDefinition`]; there are no
//! cached singletons, so callers are free to customize the result before
//! handing it to the editor.

use crate::tokenize::C_STYLE_TOKENIZE;
use crate::{LanguageDefinition, PaletteIndex, TokenPattern};

fn base(name: &str, keywords: &[&str], identifiers: &[&str]) -> LanguageDefinition {
    let mut def = LanguageDefinition::new(name);
    def.keywords = keywords.iter().map(|k| k.to_string()).collect();
    def.identifiers = identifiers
        .iter()
        .map(|k| (k.to_string(), "Built-in function".to_string()))
        .collect();
    def
}

/// The shared pattern list for C-like regex-driven languages.
fn c_like_patterns() -> Vec<TokenPattern> {
    [
        (r"[ \t]*#[ \t]*[a-zA-Z_]+", PaletteIndex::Preprocessor),
        (r#"L?"(\\.|[^"])*""#, PaletteIndex::String),
        (r"'\\?[^']'", PaletteIndex::CharLiteral),
        (
            r"[+-]?([0-9]+([.][0-9]*)?|[.][0-9]+)([eE][+-]?[0-9]+)?[fF]?",
            PaletteIndex::Number,
        ),
        (r"[+-]?[0-9]+[Uu]?[lL]?[lL]?", PaletteIndex::Number),
        (r"0[0-7]+[Uu]?[lL]?[lL]?", PaletteIndex::Number),
        (r"0[xX][0-9a-fA-F]+[uU]?[lL]?[lL]?", PaletteIndex::Number),
        (r"[a-zA-Z_][a-zA-Z0-9_]*", PaletteIndex::Identifier),
        (
            r"[\[\]\{\}\!\%\^\&\*\(\)\-\+\=\~\|\<\>\?\/\;\,\.]",
            PaletteIndex::Punctuation,
        ),
    ]
    .into_iter()
    .map(|(pattern, class)| (pattern.to_string(), class))
    .collect()
}

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Atomic", "_Bool",
    "_Complex", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert", "_Thread_local",
];

const C_IDENTIFIERS: &[&str] = &[
    "abort", "abs", "acos", "asin", "atan", "atexit", "atof", "atoi", "atol", "ceil", "clock",
    "cosh", "ctime", "div", "exit", "fabs", "floor", "fmod", "getchar", "getenv", "isalnum",
    "isalpha", "isdigit", "isgraph", "ispunct", "isspace", "isupper", "kbhit", "log10", "log2",
    "log", "memcmp", "modf", "pow", "putchar", "putenv", "puts", "rand", "remove", "rename",
    "sinh", "sqrt", "srand", "strcat", "strcmp", "strerror", "time", "tolower", "toupper",
];

pub(crate) fn c() -> LanguageDefinition {
    let mut def = base("C", C_KEYWORDS, C_IDENTIFIERS);
    def.tokenize = Some(C_STYLE_TOKENIZE);
    def.comment_start = "/*".to_string();
    def.comment_end = "*/".to_string();
    def.single_line_comment = "//".to_string();
    def
}

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "atomic_cancel", "atomic_commit",
    "atomic_noexcept", "auto", "bitand", "bitor", "bool", "break", "case", "catch", "char",
    "char16_t", "char32_t", "class", "compl", "concept", "const", "constexpr", "const_cast",
    "continue", "decltype", "default", "delete", "do", "double", "dynamic_cast", "else", "enum",
    "explicit", "export", "extern", "false", "float", "for", "friend", "goto", "if", "import",
    "inline", "int", "long", "module", "mutable", "namespace", "new", "noexcept", "not",
    "not_eq", "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "synchronized", "template", "this",
    "thread_local", "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned",
    "using", "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

const CPP_IDENTIFIERS: &[&str] = &[
    "abort", "abs", "acos", "asin", "atan", "atexit", "atof", "atoi", "atol", "ceil", "clock",
    "cosh", "ctime", "div", "exit", "fabs", "floor", "fmod", "getchar", "getenv", "isalnum",
    "isalpha", "isdigit", "isgraph", "ispunct", "isspace", "isupper", "kbhit", "log10", "log2",
    "log", "memcmp", "modf", "pow", "printf", "sprintf", "snprintf", "putchar", "putenv", "puts",
    "rand", "remove", "rename", "sinh", "sqrt", "srand", "strcat", "strcmp", "strerror", "time",
    "tolower", "toupper", "std", "string", "vector", "map", "unordered_map", "set",
    "unordered_set", "min", "max",
];

pub(crate) fn cpp() -> LanguageDefinition {
    let mut def = base("C++", CPP_KEYWORDS, CPP_IDENTIFIERS);
    def.tokenize = Some(C_STYLE_TOKENIZE);
    def.comment_start = "/*".to_string();
    def.comment_end = "*/".to_string();
    def.single_line_comment = "//".to_string();
    def
}

pub(crate) fn glsl() -> LanguageDefinition {
    let mut def = base("GLSL", C_KEYWORDS, C_IDENTIFIERS);
    def.token_patterns = c_like_patterns();
    def.comment_start = "/*".to_string();
    def.comment_end = "*/".to_string();
    def.single_line_comment = "//".to_string();
    def
}

const HLSL_KEYWORDS: &[&str] = &[
    "AppendStructuredBuffer", "asm", "asm_fragment", "BlendState", "bool", "break", "Buffer",
    "ByteAddressBuffer", "case", "cbuffer", "centroid", "class", "column_major", "compile",
    "compile_fragment", "CompileShader", "const", "continue", "ComputeShader",
    "ConsumeStructuredBuffer", "default", "DepthStencilState", "DepthStencilView", "discard",
    "do", "double", "DomainShader", "dword", "else", "export", "extern", "false", "float", "for",
    "fxgroup", "GeometryShader", "groupshared", "half", "Hullshader", "if", "in", "inline",
    "inout", "InputPatch", "int", "interface", "line", "lineadj", "linear", "LineStream",
    "matrix", "min16float", "min10float", "min16int", "min12int", "min16uint", "namespace",
    "nointerpolation", "noperspective", "NULL", "out", "OutputPatch", "packoffset", "pass",
    "pixelfragment", "PixelShader", "point", "PointStream", "precise", "RasterizerState",
    "RenderTargetView", "return", "register", "row_major", "RWBuffer", "RWByteAddressBuffer",
    "RWStructuredBuffer", "RWTexture1D", "RWTexture1DArray", "RWTexture2D", "RWTexture2DArray",
    "RWTexture3D", "sample", "sampler", "SamplerState", "SamplerComparisonState", "shared",
    "snorm", "stateblock", "stateblock_state", "static", "string", "struct", "switch",
    "StructuredBuffer", "tbuffer", "technique", "technique10", "technique11", "texture",
    "Texture1D", "Texture1DArray", "Texture2D", "Texture2DArray", "Texture2DMS",
    "Texture2DMSArray", "Texture3D", "TextureCube", "TextureCubeArray", "true", "typedef",
    "triangle", "triangleadj", "TriangleStream", "uint", "uniform", "unorm", "unsigned",
    "vector", "vertexfragment", "VertexShader", "void", "volatile", "while", "bool1", "bool2",
    "bool3", "bool4", "double1", "double2", "double3", "double4", "float1", "float2", "float3",
    "float4", "int1", "int2", "int3", "int4", "uint1", "uint2", "uint3", "uint4", "dword1",
    "dword2", "dword3", "dword4", "half1", "half2", "half3", "half4", "float1x1", "float2x2",
    "float3x3", "float4x4",
];

const HLSL_IDENTIFIERS: &[&str] = &[
    "abort", "abs", "acos", "all", "AllMemoryBarrier", "AllMemoryBarrierWithGroupSync", "any",
    "asdouble", "asfloat", "asin", "asint", "asuint", "atan", "atan2", "ceil",
    "CheckAccessFullyMapped", "clamp", "clip", "cos", "cosh", "countbits", "cross", "ddx",
    "ddx_coarse", "ddx_fine", "ddy", "ddy_coarse", "ddy_fine", "degrees", "determinant",
    "distance", "dot", "dst", "errorf", "exp", "exp2", "f16tof32", "f32tof16", "faceforward",
    "firstbithigh", "firstbitlow", "floor", "fma", "fmod", "frac", "frexp", "fwidth",
    "GroupMemoryBarrier", "GroupMemoryBarrierWithGroupSync", "InterlockedAdd", "InterlockedAnd",
    "InterlockedCompareExchange", "InterlockedCompareStore", "InterlockedExchange",
    "InterlockedMax", "InterlockedMin", "InterlockedOr", "InterlockedXor", "isfinite", "isinf",
    "isnan", "ldexp", "length", "lerp", "lit", "log", "log10", "log2", "mad", "max", "min",
    "modf", "msad4", "mul", "noise", "normalize", "pow", "printf", "radians", "rcp", "reflect",
    "refract", "reversebits", "round", "rsqrt", "saturate", "sign", "sin", "sincos", "sinh",
    "smoothstep", "sqrt", "step", "tan", "tanh", "tex1D", "tex2D", "tex3D", "texCUBE",
    "transpose", "trunc",
];

pub(crate) fn hlsl() -> LanguageDefinition {
    let mut def = base("HLSL", HLSL_KEYWORDS, HLSL_IDENTIFIERS);
    def.token_patterns = c_like_patterns();
    def.comment_start = "/*".to_string();
    def.comment_end = "*/".to_string();
    def.single_line_comment = "//".to_string();
    def
}

const SQL_KEYWORDS: &[&str] = &[
    "ADD", "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "AUTHORIZATION", "BACKUP", "BEGIN",
    "BETWEEN", "BREAK", "BROWSE", "BULK", "BY", "CASCADE", "CASE", "CHECK", "CHECKPOINT",
    "CLOSE", "CLUSTERED", "COALESCE", "COLLATE", "COLUMN", "COMMIT", "COMPUTE", "CONSTRAINT",
    "CONTAINS", "CONTINUE", "CONVERT", "CREATE", "CROSS", "CURRENT", "CURRENT_DATE",
    "CURRENT_TIME", "CURRENT_TIMESTAMP", "CURRENT_USER", "CURSOR", "DATABASE", "DBCC",
    "DEALLOCATE", "DECLARE", "DEFAULT", "DELETE", "DENY", "DESC", "DISK", "DISTINCT",
    "DISTRIBUTED", "DOUBLE", "DROP", "DUMP", "ELSE", "END", "ERRLVL", "ESCAPE", "EXCEPT",
    "EXEC", "EXECUTE", "EXISTS", "EXIT", "FETCH", "FILE", "FILLFACTOR", "FOR", "FOREIGN",
    "FREETEXT", "FROM", "FULL", "FUNCTION", "GOTO", "GRANT", "GROUP", "HAVING", "HOLDLOCK",
    "IDENTITY", "IF", "IN", "INDEX", "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN",
    "KEY", "KILL", "LEFT", "LIKE", "LINENO", "LOAD", "NATIONAL", "NOCHECK", "NONCLUSTERED",
    "NOT", "NULL", "NULLIF", "OF", "OFF", "OFFSETS", "ON", "OPEN", "OPTION", "OR", "ORDER",
    "OUTER", "OVER", "PERCENT", "PLAN", "PRECISION", "PRIMARY", "PRINT", "PROC", "PROCEDURE",
    "PUBLIC", "RAISERROR", "READ", "READTEXT", "RECONFIGURE", "REFERENCES", "REPLICATION",
    "RESTORE", "RESTRICT", "RETURN", "REVOKE", "RIGHT", "ROLLBACK", "ROWCOUNT", "ROWGUIDCOL",
    "RULE", "SAVE", "SCHEMA", "SELECT", "SESSION_USER", "SET", "SETUSER", "SHUTDOWN", "SOME",
    "STATISTICS", "SYSTEM_USER", "TABLE", "TEXTSIZE", "THEN", "TO", "TOP", "TRAN",
    "TRANSACTION", "TRIGGER", "TRUNCATE", "UNION", "UNIQUE", "UPDATE", "UPDATETEXT", "USE",
    "USER", "VALUES", "VARYING", "VIEW", "WAITFOR", "WHEN", "WHERE", "WHILE", "WITH",
    "WRITETEXT",
];

const SQL_IDENTIFIERS: &[&str] = &[
    "ABS", "ACOS", "ASCII", "ASIN", "ATAN", "ATAN2", "AVG", "CAST", "CEIL", "CHR", "COALESCE",
    "CONCAT", "CONVERT", "CORR", "COS", "COSH", "COUNT", "CUME_DIST", "DECODE", "DENSE_RANK",
    "EXP", "EXTRACT", "FIRST_VALUE", "FLOOR", "GREATEST", "INITCAP", "INSTR", "LAG",
    "LAST_VALUE", "LEAD", "LEAST", "LENGTH", "LN", "LOG", "LOWER", "LPAD", "LTRIM", "MAX",
    "MEDIAN", "MIN", "MOD", "NULLIF", "NVL", "POWER", "RANK", "REGEXP_COUNT", "REGEXP_INSTR",
    "REGEXP_REPLACE", "REGEXP_SUBSTR", "REPLACE", "ROUND", "ROWNUM", "RPAD", "RTRIM", "SIGN",
    "SIN", "SINH", "SOUNDEX", "SQRT", "STDDEV", "SUBSTR", "SUM", "SYSDATE", "TAN", "TANH",
    "TO_CHAR", "TO_DATE", "TO_NUMBER", "TO_TIMESTAMP", "TRANSLATE", "TRIM", "TRUNC", "UID",
    "UPPER", "USER", "VARIANCE",
];

pub(crate) fn sql() -> LanguageDefinition {
    let mut def = base("SQL", SQL_KEYWORDS, SQL_IDENTIFIERS);
    def.token_patterns = vec![
        (r#"L?"(\\.|[^"])*""#.to_string(), PaletteIndex::String),
        (r"'[^']*'".to_string(), PaletteIndex::String),
        (
            r"[+-]?([0-9]+([.][0-9]*)?|[.][0-9]+)([eE][+-]?[0-9]+)?[fF]?".to_string(),
            PaletteIndex::Number,
        ),
        (r"[+-]?[0-9]+[Uu]?[lL]?[lL]?".to_string(), PaletteIndex::Number),
        (r"0[xX][0-9a-fA-F]+[uU]?[lL]?[lL]?".to_string(), PaletteIndex::Number),
        (r"[a-zA-Z_][a-zA-Z0-9_]*".to_string(), PaletteIndex::Identifier),
        (
            r"[\[\]\{\}\!\%\^\&\*\(\)\-\+\=\~\|\<\>\?\/\;\,\.]".to_string(),
            PaletteIndex::Punctuation,
        ),
    ];
    def.comment_start = "/*".to_string();
    def.comment_end = "*/".to_string();
    def.single_line_comment = "--".to_string();
    def.case_sensitive = false;
    def.auto_indentation = false;
    def
}

const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

const LUA_IDENTIFIERS: &[&str] = &[
    "assert", "collectgarbage", "dofile", "error", "getmetatable", "ipairs", "loadfile", "load",
    "loadstring", "next", "pairs", "pcall", "print", "rawequal", "rawlen", "rawget", "rawset",
    "select", "setmetatable", "tonumber", "tostring", "type", "xpcall", "_G", "_VERSION",
    "coroutine", "table", "io", "os", "string", "utf8", "bit32", "math", "debug", "package",
    "abs", "acos", "asin", "atan", "ceil", "cos", "deg", "exp", "floor", "fmod", "log", "max",
    "min", "modf", "rad", "random", "randomseed", "sin", "sqrt", "tan", "byte", "char", "dump",
    "find", "format", "gmatch", "gsub", "len", "lower", "match", "rep", "reverse", "sub",
    "upper", "concat", "insert", "remove", "sort", "unpack", "require", "clock", "date", "time",
];

pub(crate) fn lua() -> LanguageDefinition {
    let mut def = base("Lua", LUA_KEYWORDS, LUA_IDENTIFIERS);
    def.token_patterns = vec![
        (r#"L?"(\\.|[^"])*""#.to_string(), PaletteIndex::String),
        (r"'[^']*'".to_string(), PaletteIndex::String),
        (r"0[xX][0-9a-fA-F]+[uU]?[lL]?[lL]?".to_string(), PaletteIndex::Number),
        (
            r"[+-]?([0-9]+([.][0-9]*)?|[.][0-9]+)([eE][+-]?[0-9]+)?[fF]?".to_string(),
            PaletteIndex::Number,
        ),
        (r"[+-]?[0-9]+[Uu]?[lL]?[lL]?".to_string(), PaletteIndex::Number),
        (r"[a-zA-Z_][a-zA-Z0-9_]*".to_string(), PaletteIndex::Identifier),
        (
            r"[\[\]\{\}\!\%\^\&\*\(\)\-\+\=\~\|\<\>\?\/\;\,\.]".to_string(),
            PaletteIndex::Punctuation,
        ),
    ];
    def.comment_start = "--[[".to_string();
    def.comment_end = "]]".to_string();
    def.single_line_comment = "--".to_string();
    def.auto_indentation = false;
    def
}
