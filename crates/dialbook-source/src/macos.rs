use crate::source::ContactStore;
use crate::{Result, SourceError};
use dialbook_core::{PermissionStatus, RawContactRecord};

/// Contacts.app on macOS, optionally limited to one group.
#[derive(Debug, Clone, Default)]
pub struct MacosContactsStore {
    pub group: Option<String>,
}

impl MacosContactsStore {
    pub fn new(group: Option<String>) -> Self {
        Self { group }
    }
}

impl ContactStore for MacosContactsStore {
    fn source_name(&self) -> &'static str {
        "macos-contacts"
    }

    async fn request_permission(&self) -> Result<PermissionStatus> {
        request_contacts_permission().await
    }

    async fn fetch_contacts(&self) -> Result<Vec<RawContactRecord>> {
        let data = fetch_contacts_vcf(self.group.as_deref()).await?;
        Ok(crate::vcf::parse_vcf_logged(&data))
    }
}

/// AppleScript error raised when the user has not allowed automation of
/// Contacts.app.
const NOT_AUTHORIZED: &str = "-1743";

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn permission_from_stderr(stderr: &str) -> Option<PermissionStatus> {
    if stderr.contains(NOT_AUTHORIZED) {
        return Some(PermissionStatus::Denied);
    }
    None
}

#[cfg(target_os = "macos")]
async fn request_contacts_permission() -> Result<PermissionStatus> {
    let output = run_osascript(r#"tell application "Contacts" to count people"#, None).await?;
    if output.status.success() {
        return Ok(PermissionStatus::Granted);
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    permission_from_stderr(&stderr).ok_or_else(|| command_error(&output))
}

#[cfg(target_os = "macos")]
async fn fetch_contacts_vcf(group: Option<&str>) -> Result<String> {
    let script = r#"
on run argv
    set oldDelimiters to AppleScript's text item delimiters
    set AppleScript's text item delimiters to linefeed
    set cards to {}
    set succeeded to false
    repeat 5 times
        try
            tell application "Contacts"
                if (count of argv) is 0 then
                    set cards to vcard of people
                else
                    set targetGroup to item 1 of argv
                    set targetGroupRef to first group whose name is targetGroup
                    set cards to vcard of people of targetGroupRef
                end if
            end tell
            set succeeded to true
            exit repeat
        on error errMsg number errNum
            if errNum is -600 then
                tell application "Contacts" to launch
                delay 0.2
            else
                error errMsg number errNum
            end if
        end try
    end repeat
    if succeeded is false then
        error "Contacts did not respond" number -600
    end if
    if (count of cards) is 0 then
        set joined to ""
    else
        set joined to cards as text
    end if
    set AppleScript's text item delimiters to oldDelimiters
    return joined
end run
"#;

    let group = group.map(str::trim).filter(|group| !group.is_empty());
    let output = run_osascript(script, group).await?;
    if !output.status.success() {
        return Err(command_error(&output));
    }

    String::from_utf8(output.stdout)
        .map_err(|_| SourceError::Parse("macOS Contacts output was not valid UTF-8".to_string()))
}

#[cfg(target_os = "macos")]
async fn run_osascript(script: &str, arg: Option<&str>) -> Result<std::process::Output> {
    let mut cmd = tokio::process::Command::new("osascript");
    cmd.arg("-e").arg(script);
    if let Some(arg) = arg {
        cmd.arg(arg);
    }
    Ok(cmd.output().await?)
}

#[cfg(target_os = "macos")]
fn command_error(output: &std::process::Output) -> SourceError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = if stderr.trim().is_empty() {
        format!("osascript exited with status {}", output.status)
    } else {
        stderr.trim().to_string()
    };
    SourceError::Command(message)
}

#[cfg(not(target_os = "macos"))]
async fn request_contacts_permission() -> Result<PermissionStatus> {
    Err(unavailable())
}

#[cfg(not(target_os = "macos"))]
async fn fetch_contacts_vcf(_group: Option<&str>) -> Result<String> {
    Err(unavailable())
}

#[cfg(not(target_os = "macos"))]
fn unavailable() -> SourceError {
    SourceError::Unavailable("macOS Contacts is only available on macOS".to_string())
}
