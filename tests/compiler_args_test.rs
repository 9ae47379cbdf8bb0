//! Tests for the compiler options facade and invoker.

use std::io;
use std::process::Output;
use std::sync::{Arc, Mutex};

use ast_contract::config::CompilerConfig;
use ast_contract::infrastructure::compiler::{
    AdvancedOptions, AnnotationProcessingOptions, ClasspathOptions, CompilerArgsBuilder,
    CompilerInvoker, ComplianceOptions, SourceOptions,
};
use ast_contract::infrastructure::traits::CommandRunner;
use ast_contract::infrastructure::InfraError;

// ============================================================
// Ordering
// ============================================================

#[test]
fn given_options_after_sources_when_building_then_configuration_error() {
    let builder = CompilerArgsBuilder::new()
        .classpath_options(&ClasspathOptions::new().encoding("UTF-8"))
        .unwrap()
        .compliance_options(&ComplianceOptions::new().compliance(8))
        .unwrap()
        .sources(&SourceOptions::new().sources(["src/Foo.java"]));

    let result = builder.classpath_options(&ClasspathOptions::new().classpath(["lib.jar"]));

    match result {
        Err(InfraError::Configuration(message)) => {
            assert_eq!(message, "sources must be specified last")
        }
        other => panic!("expected configuration error, got {:?}", other.map(|b| b.build())),
    }
}

#[test]
fn given_each_option_group_after_sources_when_adding_then_all_rejected() {
    let with_sources =
        || CompilerArgsBuilder::new().sources(&SourceOptions::new().sources(["A.java"]));

    assert!(with_sources()
        .compliance_options(&ComplianceOptions::new())
        .is_err());
    assert!(with_sources()
        .annotation_processing_options(&AnnotationProcessingOptions::new())
        .is_err());
    assert!(with_sources()
        .advanced_options(&AdvancedOptions::new())
        .is_err());
}

#[test]
fn given_more_sources_after_sources_when_adding_then_appended() {
    let args = CompilerArgsBuilder::new()
        .sources(&SourceOptions::new().sources(["A.java"]))
        .sources(&SourceOptions::new().sources(["B.java"]))
        .build();

    assert_eq!(args, vec!["A.java", "B.java"]);
}

#[test]
fn given_full_pipeline_when_building_then_tokens_in_call_order() {
    let args = CompilerArgsBuilder::new()
        .classpath_options(
            &ClasspathOptions::new()
                .encoding("UTF-8")
                .classpath(["a.jar"]),
        )
        .unwrap()
        .compliance_options(&ComplianceOptions::new().compliance(11))
        .unwrap()
        .annotation_processing_options(&AnnotationProcessingOptions::new())
        .unwrap()
        .advanced_options(&AdvancedOptions::new().preserve_unused_vars().no_warnings())
        .unwrap()
        .sources(&SourceOptions::new().sources(["src"]))
        .build();

    assert_eq!(
        args,
        vec![
            "-encoding",
            "UTF-8",
            "-cp",
            "a.jar",
            "-d",
            "none",
            "-11",
            "-proc:none",
            "-preserveAllLocals",
            "-warn:none",
            "src",
        ]
    );
}

#[test]
fn given_binaries_dir_when_building_classpath_then_writes_there() {
    let args = CompilerArgsBuilder::new()
        .classpath_options(&ClasspathOptions::new().binaries("out"))
        .unwrap()
        .build();

    assert_eq!(args, vec!["-d", "out"]);
}

// ============================================================
// Invoker
// ============================================================

/// Records the command line and answers with a canned exit code.
struct RecordingRunner {
    calls: Mutex<Vec<(String, Vec<String>)>>,
    exit_code: i32,
}

impl RecordingRunner {
    fn new(exit_code: i32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            exit_code,
        }
    }
}

#[cfg(unix)]
fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code as u32)
}

impl CommandRunner for RecordingRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        self.calls.lock().unwrap().push((
            cmd.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        ));
        Ok(Output {
            status: exit_status(self.exit_code),
            stdout: b"1 problem (1 warning)\n".to_vec(),
            stderr: if self.exit_code == 0 {
                Vec::new()
            } else {
                b"Foo.java: syntax error\n".to_vec()
            },
        })
    }
}

fn config() -> CompilerConfig {
    CompilerConfig {
        command: "ecj".into(),
        compliance: 8,
        encoding: "UTF-8".into(),
    }
}

#[test]
fn given_config_when_building_arguments_then_sources_come_last() {
    let invoker = CompilerInvoker::new(Arc::new(RecordingRunner::new(0)), config());

    let args = invoker
        .arguments(&["lib/a.jar".to_string()], &["src".to_string()])
        .unwrap();

    assert_eq!(args.first().map(String::as_str), Some("-encoding"));
    assert!(args.contains(&"-1.8".to_string()));
    assert!(args.contains(&"-proc:none".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("src"));
}

#[test]
fn given_successful_compiler_when_compiling_then_output_captured() {
    let runner = Arc::new(RecordingRunner::new(0));
    let invoker = CompilerInvoker::new(runner.clone(), config());

    let output = invoker.compile(&["-1.8".to_string(), "Foo.java".to_string()]).unwrap();

    assert_eq!(output.stdout, "1 problem (1 warning)\n");
    let calls = runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "ecj");
    assert_eq!(calls[0].1, vec!["-1.8", "Foo.java"]);
}

#[test]
fn given_failing_compiler_when_compiling_then_compiler_error_with_code() {
    let invoker = CompilerInvoker::new(Arc::new(RecordingRunner::new(1)), config());

    let result = invoker.compile(&["Foo.java".to_string()]);

    match result {
        Err(InfraError::Compiler { message, exit_code }) => {
            assert_eq!(message, "Foo.java: syntax error");
            assert_eq!(exit_code, Some(1));
        }
        other => panic!("expected compiler error, got {:?}", other),
    }
}
