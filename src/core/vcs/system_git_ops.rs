//! Publish-run operations for SystemGit (checkout, branches, proposal commit)

use super::system_git::SystemGit;
use crate::core::error::{ConveyorError, ConveyorResult, GitError, ResultExt};
use std::path::Path;

impl SystemGit {
    /// Fetch tags from a remote so the triggering tag is resolvable locally
    pub fn fetch_tags(&self, remote_name: &str) -> ConveyorResult<()> {
        let output = self
            .git_cmd()
            .args(["fetch", "--tags", remote_name])
            .output()
            .context("Failed to fetch tags")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConveyorError::Git(GitError::CommandFailed {
                command: format!("git fetch --tags {}", remote_name),
                stderr: stderr.to_string(),
            }));
        }

        Ok(())
    }

    /// Check out an arbitrary ref (tag, branch, or SHA)
    ///
    /// Checking out a tag detaches HEAD; `advice.detachedHead` is already
    /// silenced by the command environment.
    pub fn checkout_ref(&self, refname: &str) -> ConveyorResult<()> {
        let output = self
            .git_cmd()
            .args(["checkout", refname])
            .output()
            .context("Failed to checkout ref")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConveyorError::Git(GitError::CommandFailed {
                command: format!("git checkout {}", refname),
                stderr: stderr.to_string(),
            }));
        }

        Ok(())
    }

    /// Check if a ref resolves (used by plan to warn about missing tags)
    pub fn ref_exists(&self, refname: &str) -> ConveyorResult<bool> {
        let output = self
            .git_cmd()
            .args(["rev-parse", "--verify", "--quiet", &format!("{}^{{commit}}", refname)])
            .output()
            .context("Failed to verify ref")?;

        Ok(output.status.success())
    }

    /// Create a branch
    pub fn create_branch(&self, branch_name: &str) -> ConveyorResult<()> {
        let output = self
            .git_cmd()
            .args(["branch", branch_name])
            .output()
            .context("Failed to create branch")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConveyorError::Git(GitError::BranchError {
                message: stderr.to_string(),
            }));
        }

        Ok(())
    }

    /// Checkout a branch
    pub fn checkout_branch(&self, branch_name: &str) -> ConveyorResult<()> {
        let output = self
            .git_cmd()
            .args(["checkout", branch_name])
            .output()
            .context("Failed to checkout branch")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConveyorError::Git(GitError::BranchError {
                message: stderr.to_string(),
            }));
        }

        Ok(())
    }

    /// Create and checkout a branch
    pub fn create_and_checkout_branch(&self, branch_name: &str) -> ConveyorResult<()> {
        self.create_branch(branch_name)?;
        self.checkout_branch(branch_name)?;
        Ok(())
    }

    /// Commit only the given paths with an explicit author identity
    ///
    /// The proposal commit must carry exactly one content change (the
    /// manifest), so staging is path-scoped rather than `add -A`.
    pub fn commit_paths(
        &self,
        paths: &[&Path],
        message: &str,
        author_name: &str,
        author_email: &str,
    ) -> ConveyorResult<String> {
        let mut add = self.git_cmd();
        add.args(["add", "--"]);
        for path in paths {
            add.arg(path);
        }
        let output = add.output().context("Failed to stage paths")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConveyorError::Git(GitError::CommandFailed {
                command: "git add".to_string(),
                stderr: stderr.to_string(),
            }));
        }

        let output = self
            .git_cmd()
            .arg("-c")
            .arg(format!("user.name={}", author_name))
            .arg("-c")
            .arg(format!("user.email={}", author_email))
            .args(["commit", "-m", message])
            .output()
            .context("Failed to commit")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConveyorError::Git(GitError::CommandFailed {
                command: "git commit".to_string(),
                stderr: stderr.to_string(),
            }));
        }

        self.head_commit()
    }

    /// Push to remote
    pub fn push_to_remote(&self, remote_name: &str, branch: &str) -> ConveyorResult<()> {
        let output = self
            .git_cmd()
            .args(["push", "-u", remote_name, branch])
            .output()
            .context("Failed to push")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConveyorError::Git(GitError::PushFailed {
                remote: remote_name.to_string(),
                branch: branch.to_string(),
                reason: stderr.to_string(),
            }));
        }

        Ok(())
    }
}
