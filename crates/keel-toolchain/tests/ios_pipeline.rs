//! End-to-end iOS toolchain flow: environment setup, tools resolution, AOT compile.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use keel_sdk::SdkInstallation;
use keel_targets::{HostDescriptor, HostOs, TargetArch, TargetDescriptor, TargetOs};
use keel_toolchain::process::{ProcessError, ProcessExit};
use keel_toolchain::{
    AotOutcome, AotState, ManagedAction, ManagedCompileRequest, ProcessInvocation, ProcessRunner,
    Toolchain, ToolchainConfig, ToolchainError,
};

struct RecordingRunner {
    exit_code: i32,
    calls: Mutex<Vec<ProcessInvocation>>,
}

impl RecordingRunner {
    fn new(exit_code: i32) -> Self {
        Self {
            exit_code,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<ProcessInvocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &ProcessInvocation) -> Result<ProcessExit, ProcessError> {
        self.calls.lock().unwrap().push(invocation.clone());
        Ok(ProcessExit {
            code: Some(self.exit_code),
        })
    }
}

fn host() -> HostDescriptor {
    HostDescriptor::new(HostOs::MacOs, TargetArch::X64)
}

fn ios_toolchain() -> Toolchain {
    let target = TargetDescriptor::new(TargetOs::Ios, TargetArch::Arm64, "14");
    Toolchain::with_host(target, host(), &ToolchainConfig::default()).unwrap()
}

fn install_sdk(root: &Path, versions: &[&str]) -> PathBuf {
    let package = root
        .join("packs")
        .join("Microsoft.NETCore.App.Runtime.AOT.osx-x64.Cross.ios-arm64");
    for v in versions {
        std::fs::create_dir_all(package.join(v).join("tools")).unwrap();
    }
    package
}

#[test]
fn environment_setup_for_ios_device() {
    let tc = ios_toolchain();
    let env = tc.prepare().unwrap();

    let defines: Vec<&str> = env.compile.preprocessor_definitions.iter().collect();
    assert_eq!(defines, vec!["PLATFORM_UNIX", "PLATFORM_APPLE_FAMILY", "PLATFORM_IOS"]);

    assert_eq!(
        &env.link.input_libraries[..3],
        ["z", "bz2", "Foundation.framework"]
    );
    assert_eq!(env.link.input_libraries.len(), 9);
    assert_eq!(env.link.input_libraries.last().unwrap(), "QuartzCore.framework");

    let floor: Vec<&String> = env
        .extra_args
        .iter()
        .filter(|a| a.contains("-version-min="))
        .collect();
    assert_eq!(floor, vec!["-miphoneos-version-min=14"]);
    assert_eq!(env.extra_args.last().unwrap(), "-miphoneos-version-min=14");
}

#[test]
fn repeated_setup_keeps_one_copy_of_each_define() {
    let tc = ios_toolchain();
    let mut env = keel_toolchain::ToolchainEnvironment::new();
    tc.setup_environment(&mut env).unwrap();
    tc.setup_environment(&mut env).unwrap();

    assert_eq!(env.compile.preprocessor_definitions.len(), 3);
    assert_eq!(env.link.input_libraries.len(), 18);
    assert_eq!(env.link.input_libraries[..9], env.link.input_libraries[9..]);
}

#[test]
fn configured_floor_flows_into_args() {
    let config = ToolchainConfig {
        ios_min_version: "16.4".into(),
        ..Default::default()
    };
    let target = config.descriptor(TargetOs::Ios, TargetArch::Arm64).unwrap();
    let tc = Toolchain::with_host(target, host(), &config).unwrap();
    let mut args = Vec::new();
    tc.add_common_args(&mut args).unwrap();
    assert_eq!(args.last().unwrap(), "-miphoneos-version-min=16.4");
}

#[test]
fn two_phase_compile() {
    let sdk_dir = tempfile::tempdir().unwrap();
    let package = install_sdk(sdk_dir.path(), &["6.0.1"]);
    let sdk = SdkInstallation::new(sdk_dir.path());
    let tc = ios_toolchain();
    let runner = RecordingRunner::new(0);

    let mut request = ManagedCompileRequest::resolve_tools()
        .with_input("/build/Game.dll")
        .with_search_path("/build")
        .with_search_path("/sdk/lib/mono");

    let outcome = tc.compile_managed(&sdk, &mut request, &runner).unwrap();
    let tools = package.join("6.0.1").join("tools");
    assert_eq!(outcome, AotOutcome::ToolsResolved { tools_path: tools.clone() });
    assert!(runner.calls().is_empty());

    request.action = ManagedAction::CompileAssembly;
    let outcome = tc.compile_managed(&sdk, &mut request, &runner).unwrap();
    assert_eq!(outcome, AotOutcome::Compiled);
    assert_eq!(request.state(), AotState::Succeeded);

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].working_directory, tools);
    assert_eq!(calls[0].executable, tools.join("mono-aot-cross"));
    assert_eq!(
        calls[0].argument_string(),
        "--aot=full,verbose,stats,print-skipped,nodebug -O=all \"/build/Game.dll\""
    );
    assert!(calls[0].environment.contains_key("MONO_PATH"));
    assert!(!calls[0].environment.contains_key("MONO_LOG_LEVEL"));
}

#[test]
fn highest_installed_pack_is_used() {
    let sdk_dir = tempfile::tempdir().unwrap();
    install_sdk(sdk_dir.path(), &["1.0", "2.3", "2.3.1"]);
    let sdk = SdkInstallation::new(sdk_dir.path());
    let mut request = ManagedCompileRequest::resolve_tools();
    ios_toolchain()
        .compile_managed(&sdk, &mut request, &RecordingRunner::new(0))
        .unwrap();
    assert!(request.resolved_tools_path().unwrap().ends_with("2.3.1/tools"));
}

#[test]
fn missing_pack_aborts_build() {
    let sdk_dir = tempfile::tempdir().unwrap();
    let sdk = SdkInstallation::new(sdk_dir.path());
    let mut request = ManagedCompileRequest::resolve_tools();
    let err = ios_toolchain()
        .compile_managed(&sdk, &mut request, &RecordingRunner::new(0))
        .unwrap_err();
    assert!(matches!(
        err,
        ToolchainError::Sdk(keel_sdk::SdkError::ToolNotFound { .. })
    ));
    assert_eq!(request.state(), AotState::Idle);
}

#[test]
fn compiler_failure_is_reported() {
    let sdk_dir = tempfile::tempdir().unwrap();
    install_sdk(sdk_dir.path(), &["6.0.1"]);
    let sdk = SdkInstallation::new(sdk_dir.path());
    let tc = ios_toolchain();
    let runner = RecordingRunner::new(2);

    let mut request = ManagedCompileRequest::resolve_tools()
        .with_input("Game.dll")
        .with_tool_debug(true);
    tc.compile_managed(&sdk, &mut request, &runner).unwrap();
    request.action = ManagedAction::CompileAssembly;
    let err = tc.compile_managed(&sdk, &mut request, &runner).unwrap_err();

    assert!(matches!(
        err,
        ToolchainError::SubprocessFailure {
            exit_code: Some(2),
            ..
        }
    ));
    assert_eq!(request.state(), AotState::Failed);
    let call = &runner.calls()[0];
    assert!(call.argument_string().starts_with("--debug "));
    assert_eq!(
        call.environment.get("MONO_LOG_LEVEL").map(String::as_str),
        Some("debug")
    );
}

#[test]
fn real_runner_reports_missing_compiler() {
    let sdk_dir = tempfile::tempdir().unwrap();
    install_sdk(sdk_dir.path(), &["6.0.1"]);
    let sdk = SdkInstallation::new(sdk_dir.path());
    let tc = ios_toolchain();
    let runner = keel_toolchain::SystemProcessRunner::new();

    let mut request = ManagedCompileRequest::resolve_tools().with_input("Game.dll");
    tc.compile_managed(&sdk, &mut request, &runner).unwrap();
    request.action = ManagedAction::CompileAssembly;
    let err = tc.compile_managed(&sdk, &mut request, &runner).unwrap_err();
    assert!(matches!(
        err,
        ToolchainError::Process(ProcessError::ExecutableNotFound { .. })
    ));
}
