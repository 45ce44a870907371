use itertools::Itertools;

use crate::constants::{ERROR_TAG, RESULT_SENTINEL, RESULT_TAG, TIME_TAG};
use crate::core::domain::{JudgeJob, TestCase};
use crate::harness::literal::{LiteralTarget, ValueType, declare};

pub const SOLUTION_FILE: &str = "Solution.java";
pub const DRIVER_FILE: &str = "Runner.java";
pub const DRIVER_CLASS: &str = "Runner";

const IMPORTS: &str = "import java.util.*;\nimport java.util.stream.*;\n";

/// The submission as it is written to `Solution.java`.
pub fn solution_source(job: &JudgeJob) -> String {
    format!("{}\n{}", IMPORTS, job.code)
}

/// `Runner.java`: instantiates `Solution` and calls it once per test case. Any
/// throwable ends the batch with an `ERR:` line.
pub fn generate_driver(job: &JudgeJob) -> String {
    let blocks = job
        .testcases
        .iter()
        .map(|tc| case_block(job, tc))
        .join("\n");

    format!(
        r#"{imports}
public class {class} {{
    static String quote(String s) {{
        return "\"" + s.replace("\\", "\\\\").replace("\"", "\\\"") + "\"";
    }}

    static String render(Object value, boolean nested) {{
        if (value == null) return "null";
        if (value instanceof String || value instanceof Character) {{
            String s = String.valueOf(value);
            return nested ? quote(s) : s;
        }}
        if (value.getClass().isArray()) {{
            StringBuilder sb = new StringBuilder("[");
            int n = java.lang.reflect.Array.getLength(value);
            for (int i = 0; i < n; i++) {{
                if (i > 0) sb.append(",");
                sb.append(render(java.lang.reflect.Array.get(value, i), true));
            }}
            return sb.append("]").toString();
        }}
        if (value instanceof Iterable) {{
            StringBuilder sb = new StringBuilder("[");
            boolean first = true;
            for (Object item : (Iterable<?>) value) {{
                if (!first) sb.append(",");
                sb.append(render(item, true));
                first = false;
            }}
            return sb.append("]").toString();
        }}
        return String.valueOf(value);
    }}

    public static void main(String[] args) {{
        Solution sol = new Solution();
        System.out.println("{sentinel}");

        try {{
{blocks}
        }} catch (Throwable e) {{
            System.out.println("{err}" + e);
        }}
    }}
}}
"#,
        imports = IMPORTS,
        class = DRIVER_CLASS,
        sentinel = RESULT_SENTINEL,
        blocks = blocks,
        err = ERROR_TAG,
    )
}

fn case_block(job: &JudgeJob, tc: &TestCase) -> String {
    let declarations = tc
        .input
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let hint = job.parameter_type(idx).and_then(ValueType::from_declared);
            format!(
                "                {}",
                declare(&format!("arg{}", idx), value, hint.as_ref(), LiteralTarget::Java)
            )
        })
        .join("\n");
    let call_args = (0..tc.input.len()).map(|idx| format!("arg{}", idx)).join(", ");

    format!(
        r#"            {{
{declarations}
                long start = System.nanoTime();
                Object res = sol.{function}({call_args});
                long end = System.nanoTime();
                System.out.println("\n{res}" + render(res, false));
                System.out.println("{time}" + (end - start) / 1e6);
            }}"#,
        declarations = declarations,
        function = job.function_name,
        call_args = call_args,
        res = RESULT_TAG,
        time = TIME_TAG,
    )
}
