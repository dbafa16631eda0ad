use aliastree_core::{Hierarchy, NodeId, ResolverConfig, TraversalStrategy};
use aliastree_resolve::{AliasAnalyzer, AncestorResolver, find_common_ancestor, find_path};

/// root
/// ├── folder1
/// │    ├── file1
/// │    ├── aliasToFolder2 -> folder2
/// │    └── aliasToDeepFile1 -> deepFile1
/// ├── folder2
/// │    ├── file2
/// │    └── aliasToFolder3 -> folder3
/// └── folder3
///      └── deepFolder
///           ├── deepFile1
///           └── deepFile2
struct Sample {
    h: Hierarchy,
    root: NodeId,
    folder1: NodeId,
    folder2: NodeId,
    folder3: NodeId,
    file1: NodeId,
    file2: NodeId,
    deep_folder: NodeId,
    deep_file1: NodeId,
    deep_file2: NodeId,
    alias_to_folder2: NodeId,
    alias_to_folder3: NodeId,
    alias_to_deep_file1: NodeId,
}

fn sample() -> Sample {
    let mut h = Hierarchy::new();
    let root = h.create_node("root");
    let folder1 = h.create_node("folder1");
    let folder2 = h.create_node("folder2");
    let file1 = h.create_node("file1");
    let file2 = h.create_node("file2");
    let folder3 = h.create_node("folder3");
    let deep_folder = h.create_node("deepFolder");
    let deep_file1 = h.create_node("deepFile1");
    let deep_file2 = h.create_node("deepFile2");

    h.add_child(root, folder1).unwrap();
    h.add_child(root, folder2).unwrap();
    h.add_child(root, folder3).unwrap();

    h.add_child(folder1, file1).unwrap();
    h.add_child(folder2, file2).unwrap();
    h.add_child(folder3, deep_folder).unwrap();
    h.add_child(deep_folder, deep_file1).unwrap();
    h.add_child(deep_folder, deep_file2).unwrap();

    let alias_to_folder2 = h.add_alias(folder1, "aliasToFolder2", folder2).unwrap();
    let alias_to_folder3 = h.add_alias(folder2, "aliasToFolder3", folder3).unwrap();
    let alias_to_deep_file1 = h.add_alias(folder1, "aliasToDeepFile1", deep_file1).unwrap();

    Sample {
        h,
        root,
        folder1,
        folder2,
        folder3,
        file1,
        file2,
        deep_folder,
        deep_file1,
        deep_file2,
        alias_to_folder2,
        alias_to_folder3,
        alias_to_deep_file1,
    }
}

fn resolvers() -> Vec<AncestorResolver> {
    [TraversalStrategy::Iterative, TraversalStrategy::Recursive]
        .into_iter()
        .map(|strategy| {
            AncestorResolver::with_config(
                ResolverConfig::builder().strategy(strategy).build().unwrap(),
            )
        })
        .collect()
}

fn all_nodes(h: &Hierarchy) -> Vec<NodeId> {
    h.iter().map(|n| n.id).collect()
}

#[test]
fn test_sample_scenarios() {
    let s = sample();
    let lca = |a, b| find_common_ancestor(&s.h, s.root, a, b);

    assert_eq!(lca(s.file1, s.folder2), Some(s.root));
    assert_eq!(lca(s.folder2, s.file2), Some(s.folder2));
    assert_eq!(lca(s.file1, s.deep_file1), Some(s.root));
    assert_eq!(lca(s.file2, s.folder3), Some(s.root));
    assert_eq!(lca(s.folder2, s.folder3), Some(s.root));
    assert_eq!(lca(s.deep_file1, s.deep_file2), Some(s.deep_folder));
}

#[test]
fn test_alias_node_versus_dereferenced_target() {
    let s = sample();
    let lca = |a, b| find_common_ancestor(&s.h, s.root, a, b);
    let target = s.h.alias_target(s.alias_to_folder2).unwrap();
    assert_eq!(target, s.folder2);

    // The alias sits under folder1, so it meets folder2 only at the root.
    assert_eq!(lca(s.alias_to_folder2, s.folder2), Some(s.root));
    // The dereferenced target is folder2 itself.
    assert_eq!(lca(target, s.folder2), Some(s.folder2));

    assert_eq!(lca(s.alias_to_folder2, s.file1), Some(s.folder1));
    assert_eq!(lca(target, s.file1), Some(s.root));
    assert_eq!(lca(target, s.file2), Some(s.folder2));
}

#[test]
fn test_dereferenced_targets_from_driver_calls() {
    let s = sample();
    let lca = |a, b| find_common_ancestor(&s.h, s.root, a, b);

    let deep = s.h.alias_target(s.alias_to_deep_file1).unwrap();
    assert_eq!(lca(s.file1, deep), Some(s.root));

    let folder3 = s.h.alias_target(s.alias_to_folder3).unwrap();
    assert_eq!(lca(s.file2, folder3), Some(s.root));

    let folder2 = s.h.alias_target(s.alias_to_folder2).unwrap();
    assert_eq!(lca(folder2, folder3), Some(s.root));

    // Alias node to its own deep target.
    assert_eq!(lca(s.alias_to_deep_file1, deep), Some(s.root));
    assert_eq!(lca(s.alias_to_deep_file1, s.file1), Some(s.folder1));
}

#[test]
fn test_paths_follow_structure_only() {
    let s = sample();
    let config = ResolverConfig::default();

    let path = find_path(&s.h, s.root, s.alias_to_folder2, &config).unwrap();
    assert_eq!(&*path, &[s.root, s.folder1, s.alias_to_folder2]);

    let path = find_path(&s.h, s.root, s.deep_file1, &config).unwrap();
    assert_eq!(&*path, &[s.root, s.folder3, s.deep_folder, s.deep_file1]);
    assert_eq!(path.display(&s.h), "root/folder3/deepFolder/deepFile1");

    // Reaching folder2 from folder1 is possible only through an alias.
    assert!(find_path(&s.h, s.folder1, s.folder2, &config).is_none());
    assert_eq!(find_common_ancestor(&s.h, s.folder1, s.file1, s.folder2), None);
}

#[test]
fn test_reflexivity() {
    let s = sample();
    for resolver in resolvers() {
        for n in all_nodes(&s.h) {
            assert_eq!(resolver.find_common_ancestor(&s.h, s.root, n, n), Some(n));
        }
    }
}

#[test]
fn test_ancestor_identity() {
    let s = sample();
    for resolver in resolvers() {
        for n in all_nodes(&s.h) {
            let path = resolver.find_path(&s.h, s.root, n).unwrap();
            for &a in path.iter() {
                assert_eq!(resolver.find_common_ancestor(&s.h, s.root, a, n), Some(a));
            }
        }
    }
}

#[test]
fn test_symmetry() {
    let s = sample();
    let nodes = all_nodes(&s.h);
    for resolver in resolvers() {
        for &x in &nodes {
            for &y in &nodes {
                assert_eq!(
                    resolver.find_common_ancestor(&s.h, s.root, x, y),
                    resolver.find_common_ancestor(&s.h, s.root, y, x),
                );
            }
        }
    }
}

#[test]
fn test_strategies_agree() {
    let s = sample();
    let nodes = all_nodes(&s.h);
    let resolvers = resolvers();
    let (iterative, recursive) = (&resolvers[0], &resolvers[1]);

    for &start in &nodes {
        for &x in &nodes {
            assert_eq!(
                iterative.find_path(&s.h, start, x),
                recursive.find_path(&s.h, start, x)
            );
            for &y in &nodes {
                assert_eq!(
                    iterative.find_common_ancestor(&s.h, start, x, y),
                    recursive.find_common_ancestor(&s.h, start, x, y)
                );
            }
        }
    }
}

#[test]
fn test_unreachable_yields_none() {
    let mut s = sample();
    let stray = s.h.create_node("stray");
    let other_root = s.h.create_node("root");
    let other_child = s.h.create_node("folder1");
    s.h.add_child(other_root, other_child).unwrap();

    for x in all_nodes(&s.h) {
        assert_eq!(find_common_ancestor(&s.h, s.root, x, stray), None);
        assert_eq!(find_common_ancestor(&s.h, s.root, other_child, x), None);
    }
    assert_eq!(find_common_ancestor(&s.h, s.root, s.file1, NodeId::new(999)), None);
}

#[test]
fn test_alias_to_ancestor_terminates() {
    let mut s = sample();
    let loop_alias = s.h.add_alias(s.deep_folder, "backToRoot", s.root).unwrap();

    assert_eq!(
        find_common_ancestor(&s.h, s.root, loop_alias, s.deep_file2),
        Some(s.deep_folder)
    );
    assert_eq!(
        find_common_ancestor(&s.h, s.root, loop_alias, s.root),
        Some(s.root)
    );

    let report = AliasAnalyzer::new().analyze(&s.h, s.root);
    assert_eq!(report.cyclic_count, 1);
    assert_eq!(report.cyclic().next().unwrap().alias, loop_alias);
}

#[test]
fn test_two_aliases_same_target() {
    let mut s = sample();
    let second = s.h.add_alias(s.deep_folder, "alsoFolder2", s.folder2).unwrap();
    let lca = |h: &Hierarchy, a, b| find_common_ancestor(h, s.root, a, b);

    assert_eq!(s.h.alias_target(second), s.h.alias_target(s.alias_to_folder2));
    assert_eq!(lca(&s.h, second, s.deep_file1), Some(s.deep_folder));
    assert_eq!(lca(&s.h, s.alias_to_folder2, s.deep_file1), Some(s.root));
    assert_eq!(lca(&s.h, second, s.alias_to_folder2), Some(s.root));
}

#[test]
fn test_idempotent_queries() {
    let s = sample();
    let first = find_common_ancestor(&s.h, s.root, s.deep_file1, s.alias_to_folder3);
    for _ in 0..3 {
        assert_eq!(
            find_common_ancestor(&s.h, s.root, s.deep_file1, s.alias_to_folder3),
            first
        );
    }
    assert_eq!(first, Some(s.root));
}

#[test]
fn test_deep_chain_iterative() {
    let mut h = Hierarchy::new();
    let root = h.create_node("root");
    let mut parent = root;
    let mut mid = root;
    for i in 0..100_000 {
        let child = h.create_node(format!("n{i}"));
        h.add_child(parent, child).unwrap();
        if i == 50_000 {
            mid = child;
        }
        parent = child;
    }
    let sibling = h.create_node("sibling");
    h.add_child(mid, sibling).unwrap();

    let resolver = AncestorResolver::new();
    assert_eq!(resolver.find_common_ancestor(&h, root, parent, sibling), Some(mid));
    assert_eq!(resolver.find_path(&h, root, parent).unwrap().depth(), 100_000);
}

#[test]
fn test_alias_report_on_sample() {
    let s = sample();
    let report = AliasAnalyzer::new().analyze(&s.h, s.root);

    let names: Vec<_> = report.aliases.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["aliasToFolder2", "aliasToDeepFile1", "aliasToFolder3"]);
    assert_eq!(report.cyclic_count, 0);
    assert_eq!(report.dangling_count, 0);
    assert!(report.aliases.iter().all(|e| e.common_ancestor == Some(s.root)));

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("aliasToDeepFile1"));
}

#[test]
fn test_alias_report_subtree_root() {
    let s = sample();
    let report = AliasAnalyzer::new().analyze(&s.h, s.folder1);

    assert_eq!(report.aliases.len(), 2);
    assert_eq!(report.dangling_count, 2);
    assert_eq!(report.aliases[0].target, s.folder2);
    assert_eq!(report.aliases[1].target, s.deep_file1);
}
