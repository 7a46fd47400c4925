#[cfg(test)]
mod tests {
    use boa_engine::{Context, Source};

    use crate::config::EngineConfig;
    use crate::loop_guard::{LOOP_GUARD_IDENT, LOOP_GUARD_MESSAGE};
    use crate::modules::ImportTable;
    use crate::transpile::{result_to_json, transpile, TranspileOptions};

    fn table() -> ImportTable {
        ImportTable::standard(&EngineConfig::default())
    }

    const COMPONENT: &str = r#"import { useState } from "react";
import { Button } from "@/components/ui/button";

type Props = { label?: string };

export default function App({ label = "Hi" }: Props) {
  const [count, setCount] = useState<number>(0);
  return (
    <div className={count > 2 ? "bg-red-500 p-4" : 'p-4'}>
      <Button onClick={() => setCount(count + 1)}>{label}</Button>
    </div>
  );
}
"#;

    #[test]
    fn test_component_lowers_to_plain_module() {
        let out = transpile(COMPONENT, &table(), &TranspileOptions::default()).unwrap();

        assert!(out.code.starts_with(&format!("let {} = 0;", LOOP_GUARD_IDENT)));
        assert!(out.code.contains("react/jsx-runtime"));
        assert!(!out.code.contains("<div"));
        assert!(!out.code.contains("</"));
        assert!(!out.code.contains("type Props"));
        assert!(!out.code.contains(": Props"));
        assert!(out.code.contains("export default function App"));

        assert_eq!(out.declared_imports, vec!["react", "@/components/ui/button"]);
        for token in ["bg-red-500", "p-4", "Hi"] {
            assert!(
                out.class_candidates.iter().any(|c| c == token),
                "missing candidate {token}"
            );
        }
    }

    #[test]
    fn test_disallowed_import_fails_fast() {
        let source = "import pad from \"left-pad\";\nexport default () => <Button>Hi</Button>;";
        let err = transpile(source, &table(), &TranspileOptions::default()).unwrap_err();

        assert!(err.message.contains("left-pad"));
        assert!(err.message.contains("Available modules: react, react-dom"));
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 17);

        let json = result_to_json(&Err(err));
        assert!(json.get("code").is_none());
        assert!(json["error"]["message"].as_str().unwrap().contains("left-pad"));
    }

    #[test]
    fn test_first_disallowed_import_is_reported() {
        let source = "import a from 'react';\nimport b from 'lodash';\nimport c from 'left-pad';";
        let err = transpile(source, &table(), &TranspileOptions::default()).unwrap_err();
        assert!(err.message.contains("\"lodash\""));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_disallowed_dynamic_import() {
        let source = "export default function App() {\n  const m = import('left-pad');\n  return null;\n}";
        let err = transpile(source, &table(), &TranspileOptions::default()).unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("left-pad"));
    }

    #[test]
    fn test_syntax_error_position() {
        let source = "export default function App() {\n  return <div>\n}\n";
        let err = transpile(source, &table(), &TranspileOptions::default()).unwrap_err();
        assert_eq!((err.line, err.column), (3, 0));
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_prose_that_reads_like_an_import_is_untouched() {
        let source = "function App() { return <p>Copied from 'clipboard' ok</p>; }\nexport default App;";
        let out = transpile(source, &table(), &TranspileOptions::default()).unwrap();
        assert!(out.code.contains("Copied from 'clipboard' ok"));
        assert!(!out.code.contains("esm.sh/clipboard"));
        assert!(out.declared_imports.is_empty());

        let source = r#"export default function App() { return <p>Data from "API"</p> }"#;
        let out = transpile(source, &table(), &TranspileOptions::default()).unwrap();
        assert!(out.code.contains("Data from"));
    }

    #[test]
    fn test_loop_guard_every_transform() {
        let source = "export default function App() {\n  let n = 0;\n  while (n < 5) { n++; }\n  for (let i = 0; i < 3; i++) n += i;\n  return <p>{n}</p>;\n}";
        let options = TranspileOptions {
            loop_guard_threshold: 250,
        };
        let first = transpile(source, &table(), &options).unwrap();
        let second = transpile(source, &table(), &options).unwrap();

        assert_eq!(first.code, second.code);
        assert!(first.code.starts_with("let __loopGuard = 0;"));
        assert_eq!(first.code.matches("++__loopGuard > 250").count(), 2);
        assert_eq!(first.code.matches(LOOP_GUARD_MESSAGE).count(), 2);
    }

    const COUNTING: &str = "let seen = 0;\nfunction count(n) {\n  for (let i = 0; i < n; i++) { seen++; }\n  return seen;\n}\nfunction spin() {\n  while (true) seen++;\n}";

    /// Transforms `COUNTING`, evaluates it with `call` appended and reports
    /// either the call's result or the thrown message with the iterations
    /// that ran first.
    fn run_guarded(threshold: u32, call: &str) -> String {
        let options = TranspileOptions {
            loop_guard_threshold: threshold,
        };
        let out = transpile(COUNTING, &table(), &options).unwrap();
        let script = format!(
            "{}\n;(() => {{ try {{ return \"completed:\" + {}; }} catch (e) {{ return e.message + \" after \" + seen; }} }})()",
            out.code, call
        );
        let mut context = Context::default();
        let value = context
            .eval(Source::from_bytes(script.as_bytes()))
            .unwrap();
        value
            .to_string(&mut context)
            .unwrap()
            .to_std_string_escaped()
    }

    #[test]
    fn test_guarded_loops_execute() {
        assert_eq!(run_guarded(5, "count(5)"), "completed:5");
        assert_eq!(
            run_guarded(5, "count(6)"),
            format!("{} after 5", LOOP_GUARD_MESSAGE)
        );
        assert_eq!(
            run_guarded(5, "spin()"),
            format!("{} after 5", LOOP_GUARD_MESSAGE)
        );
        // Each module starts its own counter.
        assert_eq!(run_guarded(5, "count(5)"), "completed:5");
        assert_eq!(run_guarded(100_000, "count(2000)"), "completed:2000");
    }

    #[test]
    fn test_markup_only_source() {
        let out = transpile("<Button>Hi</Button>", &table(), &TranspileOptions::default()).unwrap();
        assert!(out.code.contains("jsx"));
        assert!(!out.code.contains("<Button"));
        assert!(out.declared_imports.is_empty());
    }
}
