//! SCons build argument validation
//!
//! Validates the single positional build target and the `profile=`,
//! `profiling=` and `test=` options passed to an SCons invocation, and
//! normalizes them into a [`BuildOptions`] record.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ArgsError;

/// Maximum number of positional targets on the command line
const MAX_TARGETS: usize = 1;

/// Full usage text, appended to every validation error
pub const USAGE: &str = "\
Usage: scons <target> [profile=<debug|release|fast>] [profiling=<true|false>] [test=\"<test>\"]
    \"<target>\" is one of:
        - \"build\": build all code for the hardware platform.
        - \"run\": build all code for the hardware platform, and deploy it to the board via a connected ST-Link.
        - \"size\": build all code for the hardware platform, and display build size information.
        - \"gdb\": build all code for the hardware platform, opens a gdb session.
        - \"build-tests\": build core code and tests for the current host platform.
        - \"run-tests\": build core code and tests for the current host platform, and execute them locally with the test runner.
        - \"run-tests-gcov\": builds core code and tests, executes them locally, and captures and prints code coverage information
        - \"build-sim\": build all code for the simulated environment, for the current host platform.
        - \"run-sim\": build all code for the simulated environment, for the current host platform, and execute the simulator locally.";

/// Environment a build target compiles for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetEnv {
    /// Core code and tests on the host
    Tests,
    /// Simulated environment on the host
    Sim,
    /// The robot's microcontroller
    Hardware,
}

impl TargetEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetEnv::Tests => "tests",
            TargetEnv::Sim => "sim",
            TargetEnv::Hardware => "hardware",
        }
    }

    /// Profile used when `profile=` is not given
    pub fn default_profile(&self) -> BuildProfile {
        match self {
            TargetEnv::Tests => BuildProfile::Debug,
            TargetEnv::Sim | TargetEnv::Hardware => BuildProfile::Release,
        }
    }
}

impl fmt::Display for TargetEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positional build target accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTarget {
    BuildTests,
    RunTests,
    RunTestsGcov,
    BuildSim,
    RunSim,
    Build,
    Run,
    Size,
    Gdb,
}

impl BuildTarget {
    pub const ALL: [BuildTarget; 9] = [
        BuildTarget::BuildTests,
        BuildTarget::RunTests,
        BuildTarget::RunTestsGcov,
        BuildTarget::BuildSim,
        BuildTarget::RunSim,
        BuildTarget::Build,
        BuildTarget::Run,
        BuildTarget::Size,
        BuildTarget::Gdb,
    ];

    /// Look up a target by its command-line token
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|target| target.as_str() == token)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildTarget::BuildTests => "build-tests",
            BuildTarget::RunTests => "run-tests",
            BuildTarget::RunTestsGcov => "run-tests-gcov",
            BuildTarget::BuildSim => "build-sim",
            BuildTarget::RunSim => "run-sim",
            BuildTarget::Build => "build",
            BuildTarget::Run => "run",
            BuildTarget::Size => "size",
            BuildTarget::Gdb => "gdb",
        }
    }

    /// Environment category this target builds for
    pub fn env(&self) -> TargetEnv {
        match self {
            BuildTarget::BuildTests | BuildTarget::RunTests | BuildTarget::RunTestsGcov => {
                TargetEnv::Tests
            }
            BuildTarget::BuildSim | BuildTarget::RunSim => TargetEnv::Sim,
            BuildTarget::Build | BuildTarget::Run | BuildTarget::Size | BuildTarget::Gdb => {
                TargetEnv::Hardware
            }
        }
    }
}

/// Compiler optimization profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildProfile {
    Debug,
    Release,
    Fast,
}

impl BuildProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildProfile::Debug => "debug",
            BuildProfile::Release => "release",
            BuildProfile::Fast => "fast",
        }
    }
}

impl FromStr for BuildProfile {
    type Err = ArgsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(BuildProfile::Debug),
            "release" => Ok(BuildProfile::Release),
            "fast" => Ok(BuildProfile::Fast),
            other => Err(ArgsError::InvalidProfile {
                profile: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated build options for one SCons invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOptions {
    #[serde(rename = "TARGET_ENV")]
    pub target_env: TargetEnv,
    #[serde(rename = "BUILD_PROFILE")]
    pub build_profile: BuildProfile,
    #[serde(rename = "PROFILING", serialize_with = "serialize_flag")]
    pub profiling: bool,
    #[serde(rename = "TEST", skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
}

impl BuildOptions {
    /// Options as `KEY=VALUE` pairs, in record order
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("TARGET_ENV", self.target_env.to_string()),
            ("BUILD_PROFILE", self.build_profile.to_string()),
            ("PROFILING", flag_str(self.profiling).to_string()),
        ];
        if let Some(test) = &self.test {
            pairs.push(("TEST", test.clone()));
        }
        pairs
    }
}

fn flag_str(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}

fn serialize_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(flag_str(*flag))
}

/// Result of parsing the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// `help` was requested; print [`USAGE`] and exit successfully
    Help,
    Options(BuildOptions),
}

/// Split SCons-style tokens into positional targets and `key=value` options.
///
/// Keys are split at the first `=`; a repeated key keeps its last value.
pub fn split_tokens<S: AsRef<str>>(tokens: &[S]) -> (Vec<String>, BTreeMap<String, String>) {
    let mut targets = Vec::new();
    let mut arguments = BTreeMap::new();

    for token in tokens {
        let token = token.as_ref();
        match token.split_once('=') {
            Some((key, value)) => {
                arguments.insert(key.to_string(), value.to_string());
            }
            None => targets.push(token.to_string()),
        }
    }

    (targets, arguments)
}

/// Validate targets and options into a [`BuildOptions`] record
pub fn parse_args(
    targets: &[String],
    arguments: &BTreeMap<String, String>,
) -> Result<ParseOutcome, ArgsError> {
    if targets.len() > MAX_TARGETS {
        return Err(ArgsError::TooManyTargets);
    }

    let token = targets.first().ok_or(ArgsError::MissingTarget)?;
    if token == "help" {
        return Ok(ParseOutcome::Help);
    }

    let target = BuildTarget::from_token(token).ok_or_else(|| ArgsError::InvalidTarget {
        target: token.clone(),
    })?;
    let target_env = target.env();

    let build_profile = match arguments.get("profile") {
        Some(profile) => profile.parse()?,
        None => target_env.default_profile(),
    };

    let profiling = match arguments.get("profiling").map(String::as_str) {
        None | Some("false") => false,
        Some("true") => true,
        Some(other) => {
            return Err(ArgsError::InvalidProfiling {
                value: other.to_string(),
            })
        }
    };

    Ok(ParseOutcome::Options(BuildOptions {
        target_env,
        build_profile,
        profiling,
        test: arguments.get("test").cloned(),
    }))
}
