//! Backend launcher: picks the local or dev-container entry point.

use derive_more::Display;
use std::process::Command;

use super::error::DashboardError;

/// Environment variable set by hosted dev-containers
pub const CODESPACES_VAR: &str = "CODESPACES";
pub const LOCAL_CMD_VAR: &str = "OC_LOCAL_CMD";
pub const CODESPACES_CMD_VAR: &str = "OC_CODESPACES_CMD";

pub const DEFAULT_LOCAL_CMD: &str = "python3 backend/app.py";
pub const DEFAULT_CODESPACES_CMD: &str = "python3 backend/codespaces_app.py";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Environment {
    #[display("local")]
    Local,
    #[display("codespaces")]
    Codespaces,
}

impl Environment {
    /// Classify the value of the dev-container indicator variable
    pub fn from_indicator(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v)
                if v.eq_ignore_ascii_case("true")
                    || v.eq_ignore_ascii_case("yes")
                    || v == "1" =>
            {
                Environment::Codespaces
            }
            _ => Environment::Local,
        }
    }

    pub fn detect(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::from_indicator(lookup(CODESPACES_VAR).as_deref())
    }
}

/// Program plus arguments for one entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchCommand {
    /// Split a command line on whitespace. `var` names the source for error reporting.
    pub fn parse(line: &str, var: &str) -> Result<Self, DashboardError> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| DashboardError::EmptyCommand(var.to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl std::fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Entry points for both environments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub local: LaunchCommand,
    pub codespaces: LaunchCommand,
}

impl LaunchConfig {
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read entry points through `lookup`; unset variables use the defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DashboardError> {
        let command = |var: &str, default: &str| {
            let line = lookup(var).unwrap_or_else(|| default.to_string());
            LaunchCommand::parse(&line, var)
        };

        Ok(Self {
            local: command(LOCAL_CMD_VAR, DEFAULT_LOCAL_CMD)?,
            codespaces: command(CODESPACES_CMD_VAR, DEFAULT_CODESPACES_CMD)?,
        })
    }

    pub fn select(&self, environment: Environment) -> &LaunchCommand {
        match environment {
            Environment::Local => &self.local,
            Environment::Codespaces => &self.codespaces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_environment_from_indicator() {
        struct TestCase {
            input: Option<&'static str>,
            expected: Environment,
        }

        let tests = vec![
            TestCase {
                // TC0: unset
                input: None,
                expected: Environment::Local,
            },
            TestCase {
                // TC1: canonical value
                input: Some("true"),
                expected: Environment::Codespaces,
            },
            TestCase {
                // TC2: case insensitive
                input: Some("TRUE"),
                expected: Environment::Codespaces,
            },
            TestCase {
                // TC3: numeric
                input: Some("1"),
                expected: Environment::Codespaces,
            },
            TestCase {
                // TC4: yes
                input: Some("Yes"),
                expected: Environment::Codespaces,
            },
            TestCase {
                // TC5: falsy
                input: Some("false"),
                expected: Environment::Local,
            },
            TestCase {
                // TC6: empty
                input: Some(""),
                expected: Environment::Local,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = Environment::from_indicator(test.input);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_detect_reads_codespaces_var() {
        assert_eq!(
            Environment::detect(lookup(&[("CODESPACES", "true")])),
            Environment::Codespaces
        );
        assert_eq!(Environment::detect(lookup(&[])), Environment::Local);
    }

    #[test]
    fn test_default_commands() {
        let config = LaunchConfig::from_lookup(lookup(&[])).unwrap();

        let local = config.select(Environment::Local);
        assert_eq!(local.program, "python3");
        assert_eq!(local.args, vec!["backend/app.py"]);

        let codespaces = config.select(Environment::Codespaces);
        assert_eq!(codespaces.to_string(), DEFAULT_CODESPACES_CMD);
    }

    #[test]
    fn test_command_override() {
        let config = LaunchConfig::from_lookup(lookup(&[(
            "OC_LOCAL_CMD",
            "  uv run  backend/app.py --port 5001 ",
        )]))
        .unwrap();

        assert_eq!(
            config.local,
            LaunchCommand {
                program: "uv".to_string(),
                args: vec![
                    "run".to_string(),
                    "backend/app.py".to_string(),
                    "--port".to_string(),
                    "5001".to_string(),
                ],
            }
        );
        assert_eq!(config.codespaces.to_string(), DEFAULT_CODESPACES_CMD);
    }

    #[test]
    fn test_empty_command_is_rejected() {
        let result = LaunchConfig::from_lookup(lookup(&[("OC_CODESPACES_CMD", "   ")]));
        assert!(matches!(
            result,
            Err(DashboardError::EmptyCommand(var)) if var == "OC_CODESPACES_CMD"
        ));
    }

    #[test]
    fn test_to_command() {
        let command = LaunchCommand::parse("python3 backend/app.py", LOCAL_CMD_VAR)
            .unwrap()
            .to_command();
        assert_eq!(command.get_program(), "python3");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec!["backend/app.py"]);
    }
}
