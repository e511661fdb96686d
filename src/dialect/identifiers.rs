//! Identifier quoting and string literal escaping.
//!
//! Each backend has its own reserved word set. The generic backend uses the
//! ANSI set; PostgreSQL, Oracle, MySQL and SQLite use their own.

use regex::Regex;
use std::sync::OnceLock;

use super::Backend;

const ANSI_RESERVED: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric",
    "authorization", "between", "binary", "both", "case", "cast", "check", "collate", "column",
    "constraint", "create", "cross", "current_date", "current_role", "current_time",
    "current_timestamp", "current_user", "default", "deferrable", "desc", "distinct", "do",
    "else", "end", "except", "false", "for", "foreign", "freeze", "from", "full", "grant",
    "group", "having", "ilike", "in", "initially", "inner", "intersect", "into", "is", "isnull",
    "join", "leading", "left", "like", "limit", "localtime", "localtimestamp", "natural", "new",
    "not", "notnull", "null", "off", "offset", "old", "on", "only", "or", "order", "outer",
    "overlaps", "placing", "primary", "references", "right", "select", "session_user", "set",
    "similar", "some", "symmetric", "table", "then", "to", "trailing", "true", "union",
    "unique", "user", "using", "verbose", "when", "where",
];

const POSTGRES_RESERVED: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric",
    "authorization", "between", "binary", "both", "case", "cast", "check", "collate", "column",
    "constraint", "create", "cross", "current_catalog", "current_date", "current_role",
    "current_schema", "current_time", "current_timestamp", "current_user", "default",
    "deferrable", "desc", "distinct", "do", "else", "end", "except", "false", "fetch", "for",
    "foreign", "freeze", "from", "full", "grant", "group", "having", "ilike", "in", "initially",
    "inner", "intersect", "into", "is", "isnull", "join", "lateral", "leading", "left", "like",
    "limit", "localtime", "localtimestamp", "natural", "not", "notnull", "null", "of", "offset",
    "on", "only", "or", "order", "outer", "over", "overlaps", "placing", "primary",
    "references", "returning", "right", "select", "session_user", "similar", "some",
    "symmetric", "table", "tablesample", "then", "to", "trailing", "true", "union", "unique",
    "user", "using", "variadic", "verbose", "when", "where", "window", "with",
];

const ORACLE_RESERVED: &[&str] = &[
    "access", "add", "all", "alter", "and", "any", "as", "asc", "audit", "between", "by",
    "char", "check", "cluster", "column", "comment", "compress", "connect", "create", "current",
    "date", "decimal", "default", "delete", "desc", "distinct", "drop", "else", "exclusive",
    "exists", "file", "float", "for", "from", "grant", "group", "having", "identified",
    "immediate", "in", "increment", "index", "initial", "insert", "integer", "intersect",
    "into", "is", "level", "like", "lock", "long", "maxextents", "minus", "mlslabel", "mode",
    "modify", "noaudit", "nocompress", "not", "nowait", "null", "number", "of", "offline", "on",
    "online", "option", "or", "order", "pctfree", "prior", "public", "raw", "rename",
    "resource", "revoke", "row", "rowid", "rownum", "rows", "select", "session", "set", "share",
    "size", "smallint", "start", "successful", "synonym", "sysdate", "table", "then", "to",
    "trigger", "uid", "union", "unique", "update", "user", "validate", "values", "varchar",
    "varchar2", "view", "whenever", "where", "with",
];

const MYSQL_RESERVED: &[&str] = &[
    "accessible", "add", "all", "alter", "analyze", "and", "as", "asc", "asensitive", "before",
    "between", "bigint", "binary", "blob", "both", "by", "call", "cascade", "case", "change",
    "char", "character", "check", "collate", "column", "condition", "constraint", "continue",
    "convert", "create", "cross", "cube", "cume_dist", "current_date", "current_time",
    "current_timestamp", "current_user", "cursor", "database", "databases", "day_hour",
    "day_microsecond", "day_minute", "day_second", "dec", "decimal", "declare", "default",
    "delayed", "delete", "dense_rank", "desc", "describe", "deterministic", "distinct",
    "distinctrow", "div", "double", "drop", "dual", "each", "else", "elseif", "empty",
    "enclosed", "escaped", "except", "exists", "exit", "explain", "false", "fetch",
    "first_value", "float", "float4", "float8", "for", "force", "foreign", "from", "fulltext",
    "function", "generated", "get", "grant", "group", "grouping", "groups", "having",
    "high_priority", "hour_microsecond", "hour_minute", "hour_second", "if", "ignore", "in",
    "index", "infile", "inner", "inout", "insensitive", "insert", "int", "int1", "int2", "int3",
    "int4", "int8", "integer", "intersect", "interval", "into", "is", "iterate", "join",
    "json_table", "key", "keys", "kill", "lag", "last_value", "lateral", "lead", "leading",
    "leave", "left", "like", "limit", "linear", "lines", "load", "localtime", "localtimestamp",
    "lock", "long", "longblob", "longtext", "loop", "low_priority", "match", "maxvalue",
    "mediumblob", "mediumint", "mediumtext", "middleint", "minute_microsecond",
    "minute_second", "mod", "modifies", "natural", "not", "no_write_to_binlog", "nth_value",
    "ntile", "null", "numeric", "of", "on", "optimize", "option", "optionally", "or", "order",
    "out", "outer", "outfile", "over", "partition", "percent_rank", "precision", "primary",
    "procedure", "purge", "range", "rank", "read", "reads", "read_write", "real", "recursive",
    "references", "regexp", "release", "rename", "repeat", "replace", "require", "resignal",
    "restrict", "return", "revoke", "right", "rlike", "row", "row_number", "rows", "schema",
    "schemas", "second_microsecond", "select", "sensitive", "separator", "set", "show",
    "signal", "smallint", "spatial", "specific", "sql", "sqlexception", "sqlstate",
    "sqlwarning", "sql_big_result", "sql_calc_found_rows", "sql_small_result", "ssl",
    "starting", "stored", "straight_join", "system", "table", "terminated", "then",
    "tinyblob", "tinyint", "tinytext", "to", "trailing", "trigger", "true", "undo", "union",
    "unique", "unlock", "unsigned", "update", "usage", "use", "using", "utc_date", "utc_time",
    "utc_timestamp", "values", "varbinary", "varchar", "varcharacter", "varying", "virtual",
    "when", "where", "while", "window", "with", "write", "xor", "year_month", "zerofill",
];

const SQLITE_RESERVED: &[&str] = &[
    "add", "after", "all", "alter", "analyze", "and", "as", "asc", "attach", "autoincrement",
    "before", "begin", "between", "by", "cascade", "case", "cast", "check", "collate",
    "column", "commit", "conflict", "constraint", "create", "cross", "current_date",
    "current_time", "current_timestamp", "database", "default", "deferrable", "deferred",
    "delete", "desc", "detach", "distinct", "drop", "each", "else", "end", "escape", "except",
    "exclusive", "exists", "explain", "fail", "false", "for", "foreign", "from", "full",
    "glob", "group", "having", "if", "ignore", "immediate", "in", "index", "indexed",
    "initially", "inner", "insert", "instead", "intersect", "into", "is", "isnull", "join",
    "key", "left", "like", "limit", "match", "natural", "not", "notnull", "null", "of",
    "offset", "on", "or", "order", "outer", "plan", "pragma", "primary", "query", "raise",
    "references", "reindex", "rename", "replace", "restrict", "right", "rollback", "row",
    "select", "set", "table", "temp", "temporary", "then", "to", "transaction", "trigger",
    "true", "union", "unique", "update", "using", "vacuum", "values", "view", "virtual",
    "when", "where",
];

/// Reserved words of a backend, lowercase.
pub fn reserved_words(backend: Backend) -> &'static [&'static str] {
    match backend {
        Backend::Generic => ANSI_RESERVED,
        Backend::Postgres => POSTGRES_RESERVED,
        Backend::Oracle => ORACLE_RESERVED,
        Backend::MySql => MYSQL_RESERVED,
        Backend::Sqlite => SQLITE_RESERVED,
    }
}

fn legal_identifier() -> &'static Regex {
    static LEGAL: OnceLock<Regex> = OnceLock::new();
    LEGAL.get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_$]*$").expect("identifier pattern is valid"))
}

/// Whether an identifier must be quoted to be read back verbatim on `backend`.
///
/// Anything other than a lowercase word is quoted, as are the backend's
/// reserved words. Oracle also rejects unquoted names starting with `_` or `$`.
pub fn needs_quoting(ident: &str, backend: Backend) -> bool {
    if !legal_identifier().is_match(ident) {
        return true;
    }
    if backend == Backend::Oracle && ident.starts_with(['_', '$']) {
        return true;
    }
    reserved_words(backend).contains(&ident)
}

pub(crate) fn quote_identifier(ident: &str, backend: Backend) -> String {
    if !needs_quoting(ident, backend) {
        return ident.to_string();
    }
    let quote = backend.quote_char();
    let mut result = String::with_capacity(ident.len() + 2);
    result.push(quote);
    for c in ident.chars() {
        if c == quote {
            result.push(quote);
        }
        result.push(c);
    }
    result.push(quote);
    result
}

/// Escape a string for use inside a single-quoted SQL literal.
///
/// Quotes are doubled; MySQL additionally treats backslash as an escape.
pub fn escape_literal(s: &str, backend: Backend) -> String {
    let mut result = String::with_capacity(s.len() * 2);
    for c in s.chars() {
        match c {
            '\'' => result.push_str("''"),
            '\\' if backend == Backend::MySql => result.push_str("\\\\"),
            c => result.push(c),
        }
    }
    result
}
