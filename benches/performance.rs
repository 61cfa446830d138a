use codeflow::config::AnalysisConfig;
use codeflow::core::CodebaseAnalyzer;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("codebase_analysis");

    let test_dir = std::env::temp_dir().join("codeflow_bench");
    std::fs::create_dir_all(&test_dir).unwrap();

    // Sample Python files importing each other in a chain
    for i in 0..10 {
        let import_line = if i > 0 {
            format!("from module_{} import process\n", i - 1)
        } else {
            String::new()
        };
        let content = format!(
            r#"{}import os

class Handler{}:
    def __init__(self):
        self.value = {}

    def process(self):
        if self.value > 0:
            return self.value * 2
        return 0

def process(x):
    return x + {}
"#,
            import_line, i, i, i
        );
        std::fs::write(test_dir.join(format!("module_{}.py", i)), content).unwrap();
    }

    // Sample JavaScript files with mixed import syntax
    for i in 0..10 {
        let import_line = if i > 0 {
            format!("import {{ handle }} from './service_{}';\n", i - 1)
        } else {
            String::new()
        };
        let content = format!(
            r#"{}const util = require('util');

class Service{} {{
  constructor() {{
    this.id = {};
  }}
  handle(req) {{
    if (req && req.valid) {{
      return this.id;
    }}
    return null;
  }}
}}

export const handle = (req) => new Service{}().handle(req);
"#,
            import_line, i, i, i
        );
        std::fs::write(test_dir.join(format!("service_{}.js", i)), content).unwrap();
    }

    group.bench_function("analyze_20_files", |b| {
        let analyzer = CodebaseAnalyzer::new(&AnalysisConfig::default()).unwrap();
        b.iter(|| {
            let graph = analyzer.analyze(black_box(&test_dir)).unwrap();
            black_box(graph.nodes.len())
        });
    });

    group.finish();

    std::fs::remove_dir_all(&test_dir).ok();
}

criterion_group!(benches, benchmark_analysis);
criterion_main!(benches);
