use brig_core::manifest::{InstalledSet, Manifest};
use brig_core::platform::default_platform_tags;
use brig_resolver::graph::PlanGraph;
use brig_resolver::resolver::{resolve, ResolveOptions};

#[test]
fn graph_over_resolved_plan() {
    let manifest = Manifest::from_toml_str(
        r#"
[[package]]
name = "a"
version = "1.0-0"
deps = ["b", "c"]

[[package]]
name = "b"
version = "1.0-0"
deps = ["c"]

[[package]]
name = "c"
version = "2.1"
"#,
    )
    .unwrap();

    let plan = resolve(
        "a",
        &[manifest],
        &InstalledSet::new(),
        &ResolveOptions::default(),
    )
    .unwrap();
    assert_eq!(plan.emit(), "c-2.1-0 b-1.0-0 a-1.0-0");

    let graph = PlanGraph::from_plan(&plan, &default_platform_tags());
    assert_eq!(graph.len(), 3);

    let roots = graph.roots();
    assert_eq!(roots.len(), 1);
    assert_eq!(graph.node(roots[0]).name, "a");

    let tree = graph.print_tree();
    assert!(tree.starts_with("a-1.0-0\n"));
    assert!(tree.contains("b-1.0-0"));
    assert!(tree.contains("c-2.1-0"));
}
