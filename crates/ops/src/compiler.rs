//! Host compiler include search paths

use mosdeps_errors::Error;
use mosdeps_platform::{exec, login_exec, ExecOptions, ProcessOperations};
use regex::Regex;
use std::path::PathBuf;

/// Extract the search directories from verbose preprocessor output
///
/// Every line holding a single space followed by an absolute path counts;
/// the path ends at the first space.
///
/// # Errors
///
/// Returns an internal error if the line pattern fails to compile.
pub fn parse_search_paths(output: &str) -> Result<Vec<PathBuf>, Error> {
    let re = Regex::new(r"(?m)^ ((?:/[^/\x00 \n]+)+)")
        .map_err(|e| Error::internal(format!("search path pattern: {e}")))?;
    Ok(re
        .captures_iter(output)
        .filter_map(|caps| caps.get(1))
        .map(|m| PathBuf::from(m.as_str()))
        .collect())
}

/// Ask `compiler` for its include search paths
///
/// Runs `<compiler> -v -x c -E /dev/null` and parses what it prints on
/// stderr.
///
/// # Errors
///
/// Returns a `ProcessError` if the compiler cannot be run or fails.
pub async fn compiler_search_paths<P: ProcessOperations + ?Sized>(
    ops: &P,
    compiler: &str,
    login_shell: bool,
) -> Result<Vec<PathBuf>, Error> {
    let command = format!("{compiler} -v -x c -E /dev/null");
    let options = ExecOptions::default();

    let output = if login_shell {
        login_exec(ops, &command, &options).await?
    } else {
        exec(ops, &command, &options).await?
    };

    let paths = parse_search_paths(&output.stderr)?;
    tracing::debug!(compiler, count = paths.len(), "compiler search paths");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GCC_OUTPUT: &str = "\
Using built-in specs.
Target: x86_64-linux-gnu
ignoring nonexistent directory \"/usr/local/include/x86_64-linux-gnu\"
#include \"...\" search starts here:
#include <...> search starts here:
 /usr/lib/gcc/x86_64-linux-gnu/12/include
 /usr/local/include
 /usr/include/x86_64-linux-gnu
 /usr/include
End of search list.
";

    #[test]
    fn test_parses_gcc_search_list() {
        let paths = parse_search_paths(GCC_OUTPUT).unwrap();
        assert_eq!(
            paths,
            [
                PathBuf::from("/usr/lib/gcc/x86_64-linux-gnu/12/include"),
                PathBuf::from("/usr/local/include"),
                PathBuf::from("/usr/include/x86_64-linux-gnu"),
                PathBuf::from("/usr/include"),
            ]
        );
    }

    #[test]
    fn test_stops_at_first_space() {
        let paths = parse_search_paths(
            " /Library/Frameworks (framework directory)\n  /indented/twice\nnot/a/path\n",
        )
        .unwrap();
        assert_eq!(paths, [PathBuf::from("/Library/Frameworks")]);
    }

    #[test]
    fn test_empty_output() {
        assert!(parse_search_paths("").unwrap().is_empty());
    }
}
