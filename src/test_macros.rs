//! Declarative macros for generating tests.
//!
//! This module provides macros to reduce boilerplate in CLI argument parsing
//! and DDL rendering tests. Instead of writing repetitive test functions, you
//! can declare the test cases and let the macro generate the actual test code.

// =============================================================================
// CLI Test Macros
// =============================================================================

/// Generate a test for default values when invoked with only the required args.
#[macro_export]
macro_rules! cli_defaults_test {
    (
        required_args: [$($req_arg:literal),*],
        defaults: {
            $($def_field:ident : $def_expected:expr),* $(,)?
        } $(,)?
    ) => {
        #[rstest]
        fn test_defaults() {
            let args = Args::try_parse_from(["model_ddl", $($req_arg),*]).unwrap();
            $(
                assert_eq!(args.$def_field, $def_expected,
                    concat!("Default value mismatch for field: ", stringify!($def_field)));
            )*
        }
    };
}

/// Generate a single CLI option test.
#[macro_export]
macro_rules! cli_option_test {
    (
        test_name: $test_name:ident,
        args: [$($arg:literal),+],
        field: $field:ident,
        expected: $expected:expr $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let args = Args::try_parse_from([
                "model_ddl",
                $($arg),+
            ]).unwrap();
            assert_eq!(args.$field, $expected,
                concat!("Field ", stringify!($field), " mismatch"));
        }
    };
}

/// Generate a test that verifies a specific argument is required.
///
/// # Example
///
/// ```ignore
/// cli_required_arg_test! {
///     test_name: test_requires_model,
///     required_arg: "<MODEL>",
/// }
/// ```
#[macro_export]
macro_rules! cli_required_arg_test {
    (
        test_name: $test_name:ident,
        required_arg: $arg:literal $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let result = Args::try_parse_from(["model_ddl"]);
            assert!(result.is_err(), concat!("Should require ", $arg));
            assert!(
                result.unwrap_err().to_string().contains($arg),
                concat!("Error should mention ", $arg)
            );
        }
    };
}

/// Generate a test that verifies parsing fails with specific invalid args.
#[macro_export]
macro_rules! cli_error_test {
    (
        test_name: $test_name:ident,
        args: [$($arg:literal),+] $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let result = Args::try_parse_from([
                "model_ddl",
                $($arg),+
            ]);
            assert!(result.is_err());
        }
    };
}

// =============================================================================
// DDL Test Macros
// =============================================================================

/// Generate a test that renders a model for one dialect and checks the output
/// contains (and does not contain) the given fragments.
///
/// # Example
/// ```ignore
/// ddl_contains_test! {
///     test_name: test_oracle_integer,
///     model: r#"{"entities": [...]}"#,
///     dialect: "oracle",
///     contains: ["NUMBER(10)"],
///     excludes: ["INTEGER"],
/// }
/// ```
#[macro_export]
macro_rules! ddl_contains_test {
    (
        test_name: $test_name:ident,
        model: $model:expr,
        dialect: $dialect:literal,
        contains: [$($needle:literal),* $(,)?],
        excludes: [$($absent:literal),* $(,)?] $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let document = $crate::model::ModelDocument::from_json($model)
                .expect("model should parse");
            let options = $crate::ddl::EmitOptions {
                return_string: true,
                ..Default::default()
            };
            let output = $crate::generate_ddl(&document, $dialect, &options)
                .expect("DDL should render")
                .expect("DDL should be returned");
            $(
                assert!(output.contains($needle), concat!("DDL should contain: ", $needle));
            )*
            $(
                assert!(!output.contains($absent), concat!("DDL should not contain: ", $absent));
            )*
        }
    };
}

/// Generate a test that verifies rendering a model for one dialect fails
/// with an error matching the given pattern.
#[macro_export]
macro_rules! ddl_error_test {
    (
        test_name: $test_name:ident,
        model: $model:expr,
        dialect: $dialect:literal,
        error: $pattern:pat $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let document = $crate::model::ModelDocument::from_json($model)
                .expect("model should parse");
            let options = $crate::ddl::EmitOptions {
                return_string: true,
                ..Default::default()
            };
            let result = $crate::generate_ddl(&document, $dialect, &options);
            assert!(matches!(result, Err($pattern)), "unexpected result: {:?}", result);
        }
    };
}
