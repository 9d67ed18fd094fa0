//! Full pipeline over C# sources

use member_graph::{
    build_member_graph, render_dot, CSharpModel, DisplayTag, ExplorerSession, GraphConfig,
    NodeKeying, Palette, Selection,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

const BUMP: &str = r#"
namespace Demo
{
    class A
    {
        private int _x;
        private int _seed = 3;

        public int X
        {
            get { return _x; }
            set { _x = value; }
        }

        public void Bump()
        {
            X = X + 1;
        }
    }
}
"#;

const LEDGER: &str = r#"
class Ledger
{
    private decimal _balance;
    private int _entries;

    public decimal Balance => _balance;

    public int Entries
    {
        get { return _entries; }
        private set { _entries = value; }
    }

    public void Post(decimal amount)
    {
        _balance += amount;
        Entries = Entries + 1;
        Audit();
    }

    public void Post(int cents, string memo)
    {
        Post(cents / 100m);
    }

    private void Audit()
    {
        Log(Balance);
    }

    private void Log(decimal value)
    {
    }
}
"#;

fn edges(list: &[(&str, &str)]) -> BTreeSet<(String, String)> {
    list.iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

#[test]
fn bump_class_collapses_accessors_into_property() {
    let model = CSharpModel::parse("a.cs", BUMP).unwrap();
    let graph = build_member_graph(&model, &GraphConfig::default()).unwrap();

    assert_eq!(
        graph.edge_keys(),
        edges(&[("A.Bump()", "A.X"), ("A.X", "A._x")])
    );

    let tag = |key: &str| graph.node(graph.find_node(key).unwrap()).unwrap().tag;
    assert_eq!(tag("A._x"), DisplayTag::Field);
    assert_eq!(tag("A.X"), DisplayTag::Public);
    assert_eq!(tag("A.Bump()"), DisplayTag::Public);

    // `_seed` is never referenced from a tracked member
    assert!(graph.find_node("A._seed").is_none());
}

#[test]
fn ledger_graph_and_trimming() {
    let model = CSharpModel::parse("ledger.cs", LEDGER).unwrap();
    let session = ExplorerSession::build(&model, &GraphConfig::default()).unwrap();

    // `Post(cents / 100m)` has one argument and binds to `Post(decimal)` only
    assert_eq!(
        session.full_graph().edge_keys(),
        edges(&[
            ("Ledger.Audit()", "Ledger.Balance"),
            ("Ledger.Audit()", "Ledger.Log(decimal)"),
            ("Ledger.Balance", "Ledger._balance"),
            ("Ledger.Entries", "Ledger._entries"),
            ("Ledger.Post(decimal)", "Ledger.Audit()"),
            ("Ledger.Post(decimal)", "Ledger.Entries"),
            ("Ledger.Post(decimal)", "Ledger._balance"),
            ("Ledger.Post(int,string)", "Ledger.Post(decimal)"),
        ])
    );

    let trimmed = session
        .select(&Selection::new(["Ledger.Post(int,string)"]).with_stops(["Audit"]))
        .unwrap();
    let kept: Vec<String> = trimmed.node_keys().into_iter().collect();
    assert_eq!(
        kept,
        vec![
            "Ledger.Audit()",
            "Ledger.Entries",
            "Ledger.Post(decimal)",
            "Ledger.Post(int,string)",
            "Ledger._balance",
            "Ledger._entries",
        ]
    );

    let dot = render_dot(&trimmed, &Palette::default());
    assert!(dot.contains("\"Ledger.Audit()\" [label=\"Audit\", style=\"filled,dashed\""));
}

#[test]
fn name_keying_merges_overloads() {
    let model = CSharpModel::parse("ledger.cs", LEDGER).unwrap();
    let config = GraphConfig {
        keying: NodeKeying::Name,
        ..GraphConfig::default()
    };
    let graph = build_member_graph(&model, &config).unwrap();

    let posts: Vec<_> = graph.nodes().filter(|(_, n)| n.label == "Post").collect();
    assert_eq!(posts.len(), 1);
    assert!(graph.contains_edge("Post", "Audit"));
    assert!(graph.contains_edge("Entries", "_entries"));
}

const TOTALS: &str = r#"
class Totals
{
    private int _x;

    public int Total => Compute();

    public int Snapshot { get; } = Compute();

    private int Compute()
    {
        return _x;
    }

    public void Show()
    {
        var t = Total;
    }
}
"#;

#[test]
fn property_expressions_keep_their_method_calls() {
    let model = CSharpModel::parse("totals.cs", TOTALS).unwrap();
    let graph = build_member_graph(&model, &GraphConfig::default()).unwrap();

    assert_eq!(
        graph.edge_keys(),
        edges(&[
            ("Totals.Compute()", "Totals._x"),
            ("Totals.Show()", "Totals.Total"),
            ("Totals.Snapshot", "Totals.Compute()"),
            ("Totals.Total", "Totals.Compute()"),
        ])
    );
    assert!(graph.find_node("Totals.get_Total").is_none());
    assert!(graph.find_node("Totals.get_Snapshot").is_none());
}

#[test]
fn partial_class_parts_form_one_graph() {
    let source = r#"
partial class Sheet
{
    public void Render() { Layout(); }
}

partial class Sheet
{
    private int _width;
    private void Layout() { _width = 0; }
}
"#;
    let model = CSharpModel::parse("sheet.cs", source).unwrap();
    let graph = build_member_graph(&model, &GraphConfig::default()).unwrap();

    assert_eq!(
        graph.edge_keys(),
        edges(&[
            ("Sheet.Layout()", "Sheet._width"),
            ("Sheet.Render()", "Sheet.Layout()"),
        ])
    );
}

#[test]
fn stop_only_selection_checks_names() {
    let model = CSharpModel::parse("a.cs", BUMP).unwrap();
    let session = ExplorerSession::build(&model, &GraphConfig::default()).unwrap();

    let err = session
        .select(&Selection::default().with_stops(["Nope"]))
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown nodes: Nope");

    let full = session
        .select(&Selection::default().with_stops(["X"]))
        .unwrap();
    assert_eq!(full.edge_keys(), session.full_graph().edge_keys());
}
