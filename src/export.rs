//! Graphviz and LaTeX renderers: the collaborators that take artifacts out
//! of the core.
//!
//! File writing and external process invocation live here and only here;
//! their failures are plain [`std::io::Error`]s, not core errors.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::automaton::FiniteAutomaton;
use crate::letter::letter_text;
use crate::regex::Regex;

impl FiniteAutomaton {
    /// Render the automaton as a Graphviz digraph.
    ///
    /// The start state is marked by an edge from a hidden `"$"` point node,
    /// accepting states get `penwidth=5`, and parallel edges between the
    /// same state pair are merged under one comma-joined sorted letter
    /// label.
    pub fn to_dot(&self) -> String {
        let mut output = String::new();
        output.push_str("digraph FiniteAutomata {\n");
        output.push_str("\trankdir=LR;\n");
        output.push_str("\tnodesep=1.0;\n");
        output.push_str("\tranksep=1.0;\n");
        output.push_str("\t\"$\" [shape=point, style=invis, width=0];\n");
        let _ = writeln!(output, "\t\"$\" -> \"{}\";", self.start_state());

        let accepting_lines: BTreeSet<String> = self
            .accepting_states()
            .iter()
            .map(|state| format!("\t\"{state}\" [penwidth=5];"))
            .collect();
        output.push_str(&accepting_lines.into_iter().collect::<Vec<_>>().join("\n"));
        output.push('\n');

        let mut edge_lines: BTreeSet<String> = BTreeSet::new();
        for state in self.states() {
            // group the outgoing edges of this state by endpoint
            let mut parallel: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
            if let Some(transitions) = self.transitions_from(state) {
                for (letter, endpoints) in transitions {
                    for endpoint in endpoints {
                        parallel
                            .entry(endpoint.as_str())
                            .or_default()
                            .insert(letter_text(*letter));
                    }
                }
            }
            for (endpoint, letters) in parallel {
                let label = letters.into_iter().collect::<Vec<_>>().join(",");
                edge_lines.insert(format!("\t\"{state}\" -> \"{endpoint}\" [label=\"{label}\"];"));
            }
        }
        output.push_str(&edge_lines.into_iter().collect::<Vec<_>>().join("\n"));
        output.push('\n');
        output.push('}');
        output
    }

    /// Write `<name>.dot` under `output_dir` and rasterize it to
    /// `<name>.png` with the external `dot` command.
    pub fn export_graph(&self, output_dir: impl AsRef<Path>, name: &str) -> io::Result<()> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;

        let dot_path = output_dir.join(format!("{name}.dot"));
        fs::write(&dot_path, self.to_dot())?;

        let png_path = output_dir.join(format!("{name}.png"));
        Command::new("dot")
            .arg("-Tpng")
            .arg(&dot_path)
            .arg("-o")
            .arg(&png_path)
            .status()?;
        Ok(())
    }
}

impl Regex {
    /// Render the expression as a standalone LaTeX article with the
    /// expression in a display-math block. LaTeX specials are escaped, `*`
    /// becomes `^*` and λ becomes `\lambda`.
    pub fn to_latex(&self) -> String {
        let mut escaped = String::new();
        for c in self.to_string().chars() {
            match c {
                'λ' => escaped.push_str("\\lambda"),
                '\\' => escaped.push_str("\\textbackslash{}"),
                '{' | '}' | '_' | '^' | '$' | '&' | '#' | '%' | '~' => {
                    escaped.push('\\');
                    escaped.push(c);
                }
                '*' => escaped.push_str("^*"),
                _ => escaped.push(c),
            }
        }

        format!(
            "\\documentclass{{article}}\n\
             \\usepackage{{amsmath}}\n\
             \\begin{{document}}\n\
             {{\\Huge \\[ {escaped} \\] }}\n\
             \\end{{document}}"
        )
    }

    /// Write `<name>.tex` under `output_dir` and typeset it with the
    /// external `pdflatex` command (run twice, as cross-references may
    /// need), then drop the auxiliary files.
    pub fn export_expression(&self, output_dir: impl AsRef<Path>, name: &str) -> io::Result<()> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;

        let tex_path = output_dir.join(format!("{name}.tex"));
        fs::write(&tex_path, self.to_latex())?;

        for _ in 0..2 {
            Command::new("pdflatex")
                .arg(format!("-output-directory={}", output_dir.display()))
                .arg(&tex_path)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()?;
        }

        for entry in fs::read_dir(output_dir)? {
            let path = entry?.path();
            if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
                if matches!(extension, "aux" | "log" | "out" | "toc") {
                    fs::remove_file(path)?;
                }
            }
        }
        Ok(())
    }
}
