// tests/invoker_policy.rs

use std::error::Error;
use std::io;
use std::path::Path;

use tscbuild::errors::{InvocationError, TscBuildError};
use tscbuild::exec::embedded::parse_fault;
use tscbuild::exec::{
    select_strategy, CompilerInvoker, CompilerScripts, EmbeddedCompiler, InvocationPolicy,
};
use tscbuild::fs::mock::MockFileSystem;
use tscbuild::types::Strategy;
use tscbuild_test_utils::builders::BuildOptionsBuilder;
use tscbuild_test_utils::fake_engine::{fake_scripts, FakeScriptEngine};
use tscbuild_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

const MISSING_EXECUTABLE: &str = "tscbuild-test-no-such-compiler";

fn args() -> Vec<String> {
    ["--target", "ES5", "--outDir", "out", "src/a.ts"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn embedded(engine: &FakeScriptEngine) -> EmbeddedCompiler {
    EmbeddedCompiler::new(Box::new(engine.clone()), fake_scripts())
}

fn launch_failure() -> InvocationError {
    InvocationError::LaunchFailure {
        executable: "tsc".to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, "not found"),
    }
}

#[tokio::test]
async fn missing_executable_falls_back_to_embedded_once() -> TestResult {
    init_tracing();

    let options = BuildOptionsBuilder::new()
        .use_external(true)
        .executable(MISSING_EXECUTABLE)
        .build();
    let engine = FakeScriptEngine::new();
    let runs = engine.runs();
    let mut invoker = CompilerInvoker::new(&options, Some(embedded(&engine)))?;

    let result = invoker.invoke(&args()).await?;

    assert_eq!(result.strategy, Strategy::Embedded);
    assert!(result.success());
    assert_eq!(invoker.fallback_count(), 1);

    let runs = runs.lock().unwrap();
    assert_eq!(runs.len(), 1);
    let mut expected = vec!["node".to_string(), "tsc.js".to_string()];
    expected.extend(args());
    assert_eq!(runs[0], expected);

    Ok(())
}

#[tokio::test]
async fn external_only_launch_failure_never_reaches_embedded() -> TestResult {
    init_tracing();

    let options = BuildOptionsBuilder::new()
        .external_only(true)
        .executable(MISSING_EXECUTABLE)
        .build();
    let engine = FakeScriptEngine::new();
    let runs = engine.runs();
    let mut invoker = CompilerInvoker::new(&options, Some(embedded(&engine)))?;

    let err = invoker.invoke(&args()).await.expect_err("launch failure expected");

    assert!(matches!(err, InvocationError::LaunchFailure { .. }));
    assert!(err.to_string().contains(MISSING_EXECUTABLE));
    assert_eq!(invoker.fallback_count(), 0);
    assert!(runs.lock().unwrap().is_empty());

    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn nonzero_exit_does_not_fall_back() -> TestResult {
    init_tracing();

    let options = BuildOptionsBuilder::new()
        .use_external(true)
        .executable("false")
        .build();
    let engine = FakeScriptEngine::new();
    let runs = engine.runs();
    let mut invoker = CompilerInvoker::new(&options, Some(embedded(&engine)))?;

    let result = invoker.invoke(&args()).await?;

    assert_eq!(result.strategy, Strategy::External);
    assert_ne!(result.status, 0);
    assert!(matches!(
        result.check(),
        Err(InvocationError::NonZeroExit { strategy: Strategy::External, .. })
    ));
    assert_eq!(invoker.fallback_count(), 0);
    assert!(runs.lock().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn embedded_is_used_directly_when_external_is_off() -> TestResult {
    init_tracing();

    let options = BuildOptionsBuilder::new().build();
    let engine = FakeScriptEngine::new();
    let runs = engine.runs();
    let mut invoker = CompilerInvoker::new(&options, Some(embedded(&engine)))?;

    invoker.invoke(&args()).await?;
    invoker.invoke(&args()).await?;

    assert_eq!(invoker.fallback_count(), 0);
    assert_eq!(runs.lock().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn embedded_exit_status_is_reported_like_a_process_status() -> TestResult {
    init_tracing();

    let options = BuildOptionsBuilder::new().build();
    let engine = FakeScriptEngine::new().exiting_with(2);
    let mut invoker = CompilerInvoker::new(&options, Some(embedded(&engine)))?;

    let result = invoker.invoke(&args()).await?;
    assert_eq!(result.status, 2);
    assert!(matches!(
        result.check(),
        Err(InvocationError::NonZeroExit { strategy: Strategy::Embedded, status: 2 })
    ));
    Ok(())
}

#[tokio::test]
async fn engine_fault_carries_message_and_stack() -> TestResult {
    init_tracing();

    let options = BuildOptionsBuilder::new().build();
    let engine = FakeScriptEngine::new().faulting("Cannot read property 'length' of undefined");
    let mut invoker = CompilerInvoker::new(&options, Some(embedded(&engine)))?;

    let err = invoker.invoke(&args()).await.expect_err("fault expected");
    assert_eq!(
        err.to_string(),
        "JavaScript Error: Cannot read property 'length' of undefined"
    );
    assert!(err.stack().is_some_and(|s| s.contains("tsc.js")));
    Ok(())
}

#[test]
fn no_runnable_strategy_is_a_configuration_error() {
    let options = BuildOptionsBuilder::new().build();

    let err = CompilerInvoker::new(&options, None).expect_err("no strategy available");
    assert!(matches!(err, TscBuildError::ConfigError(_)));
    assert!(err.is_unrecoverable());
}

#[test]
fn unreadable_compiler_script_disables_embedded_strategy() {
    init_tracing();
    let fs = MockFileSystem::new();

    let embedded_only = BuildOptionsBuilder::new().build();
    assert!(matches!(
        CompilerInvoker::from_options(&fs, &embedded_only),
        Err(TscBuildError::ConfigError(_))
    ));

    let with_external = BuildOptionsBuilder::new().use_external(true).build();
    let invoker = CompilerInvoker::from_options(&fs, &with_external).expect("external still usable");
    assert!(!invoker.embedded_ready());
}

#[test]
fn compiler_script_is_loaded_after_the_host_prelude() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file(
        "node_modules/typescript/lib/tsc.js",
        "#!/usr/bin/env node\nvar ts = {};\n",
    );

    let scripts = CompilerScripts::load(&fs, Path::new("node_modules/typescript/lib/tsc.js"))?;

    assert_eq!(scripts.scripts().len(), 2);
    assert_eq!(scripts.entry_name(), "tsc.js");
    assert_eq!(scripts.scripts()[1].source, "\nvar ts = {};\n");

    let program = scripts.program();
    let prelude_at = program.find("uncaughtException").expect("prelude present");
    let compiler_at = program.find("var ts").expect("compiler present");
    assert!(prelude_at < compiler_at);
    assert!(!program.contains("#!"));

    let invoker = CompilerInvoker::from_options(&fs, &BuildOptionsBuilder::new().build())?;
    assert!(invoker.embedded_ready());
    Ok(())
}

#[test]
fn compiler_script_keeps_its_line_numbers() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("with-shebang.js", "#!/usr/bin/env node\nvar a = 1;\nthrow new Error(\"x\");\n");
    fs.add_file("plain.js", "var a = 1;\nthrow new Error(\"x\");\n");

    let with_shebang = CompilerScripts::load(&fs, Path::new("with-shebang.js"))?.program();
    let lines: Vec<&str> = with_shebang.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("uncaughtException"), "prelude takes the shebang line");
    assert_eq!(lines[1], "var a = 1;");
    assert_eq!(lines[2], "throw new Error(\"x\");");

    let plain = CompilerScripts::load(&fs, Path::new("plain.js"))?.program();
    let lines: Vec<&str> = plain.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("})();var a = 1;"));
    assert_eq!(lines[1], "throw new Error(\"x\");");
    Ok(())
}

#[test]
fn select_strategy_follows_policy() {
    let policy = |use_embedded, use_external, external_only| InvocationPolicy {
        use_embedded,
        use_external,
        external_only,
    };
    let nonzero = InvocationError::NonZeroExit {
        strategy: Strategy::External,
        status: 1,
    };
    let launch = launch_failure();

    // First choice.
    assert_eq!(select_strategy(&policy(true, false, false), true, None), Some(Strategy::Embedded));
    assert_eq!(select_strategy(&policy(true, true, false), true, None), Some(Strategy::External));
    assert_eq!(select_strategy(&policy(true, false, false), false, None), None);

    // Fallback only after an external launch failure.
    let both = policy(true, true, false);
    assert_eq!(
        select_strategy(&both, true, Some((Strategy::External, &launch))),
        Some(Strategy::Embedded)
    );
    assert_eq!(select_strategy(&both, true, Some((Strategy::External, &nonzero))), None);
    assert_eq!(select_strategy(&both, false, Some((Strategy::External, &launch))), None);
    assert_eq!(select_strategy(&both, true, Some((Strategy::Embedded, &launch))), None);

    // External-only never reaches the embedded engine.
    let strict = policy(true, true, true);
    assert_eq!(select_strategy(&strict, true, None), Some(Strategy::External));
    assert_eq!(select_strategy(&strict, true, Some((Strategy::External, &launch))), None);
}

#[test]
fn fault_marker_is_parsed_from_engine_stderr() {
    let stderr: Vec<String> = [
        "warning: something unrelated",
        "tscbuild engine fault: Unexpected token",
        "SyntaxError: Unexpected token",
        "    at tsc.js:10:3",
        "",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    match parse_fault(&stderr) {
        Some(InvocationError::EngineFault { message, stack }) => {
            assert_eq!(message, "Unexpected token");
            assert_eq!(
                stack.as_deref(),
                Some("SyntaxError: Unexpected token\n    at tsc.js:10:3")
            );
        }
        other => panic!("expected engine fault, got {other:?}"),
    }

    assert!(parse_fault(&["error TS2304: Cannot find name 'x'.".to_string()]).is_none());
}
