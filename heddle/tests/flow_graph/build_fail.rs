//! Build failures: every structural problem is reported before anything runs.

use heddle::{BuildError, FlowDefinition, GraphBuilder, END};

use crate::common::{sentiment_flow, sentiment_registry};

fn build_err(flow: &FlowDefinition) -> BuildError {
    match GraphBuilder::build(flow, &sentiment_registry("positive")) {
        Err(e) => e,
        Ok(_) => panic!("expected build error"),
    }
}

/// **Scenario**: Every resolvable definition builds and the graph's node set equals the definition's.
#[test]
fn resolvable_flow_builds_with_same_nodes() {
    let flow = sentiment_flow();
    let graph = GraphBuilder::build(&flow, &sentiment_registry("positive")).unwrap();
    let declared: Vec<&str> = flow.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(graph.node_names(), declared.as_slice());
    assert_eq!(graph.entry_point(), "analyze");
    assert!(!graph.contains_node(END));
}

/// **Scenario**: A plain edge to an undeclared node is a DanglingEdge naming that node.
#[test]
fn edge_to_undeclared_node_is_dangling() {
    let mut flow = sentiment_flow();
    flow.edges[0].to = "ghost".into();
    match build_err(&flow) {
        BuildError::DanglingEdge { from, to, missing } => {
            assert_eq!(from, "positive_response");
            assert_eq!(to, "ghost");
            assert_eq!(missing, "ghost");
        }
        other => panic!("expected DanglingEdge, got {:?}", other),
    }
}

/// **Scenario**: A condition target outside the node list (and not `__END__`) is a DanglingEdge.
#[test]
fn condition_target_undeclared_is_dangling() {
    let mut flow = sentiment_flow();
    flow.conditional_edges
        .as_mut()
        .unwrap()
        .conditions
        .insert("neutral".into(), "neutral_response".into());
    assert!(matches!(
        build_err(&flow),
        BuildError::DanglingEdge { missing, .. } if missing == "neutral_response"
    ));
}

/// **Scenario**: `__END__` is always a valid target, for edges and conditions alike.
#[test]
fn end_is_a_valid_condition_target() {
    let mut flow = sentiment_flow();
    flow.conditional_edges
        .as_mut()
        .unwrap()
        .conditions
        .insert("neutral".into(), END.into());
    assert!(GraphBuilder::build(&flow, &sentiment_registry("positive")).is_ok());
}

#[test]
fn conditional_source_undeclared_is_dangling() {
    let mut flow = sentiment_flow();
    flow.conditional_edges.as_mut().unwrap().from = "nowhere".into();
    assert!(matches!(
        build_err(&flow),
        BuildError::DanglingEdge { missing, .. } if missing == "nowhere"
    ));
}

/// **Scenario**: A node with a plain edge that is also the conditional source conflicts.
#[test]
fn plain_edge_and_conditional_on_same_node_conflict() {
    let mut flow = sentiment_flow();
    flow.edges.push(heddle::EdgeDecl {
        from: "analyze".into(),
        to: "positive_response".into(),
    });
    assert!(matches!(
        build_err(&flow),
        BuildError::ConflictingRouting(node) if node == "analyze"
    ));
}

#[test]
fn two_plain_edges_from_one_node() {
    let mut flow = sentiment_flow();
    flow.edges.push(heddle::EdgeDecl {
        from: "positive_response".into(),
        to: "negative_response".into(),
    });
    assert!(matches!(
        build_err(&flow),
        BuildError::MultipleSuccessors(node) if node == "positive_response"
    ));
}

#[test]
fn entry_point_must_be_declared() {
    let mut flow = sentiment_flow();
    flow.entry_point = "start".into();
    assert!(matches!(
        build_err(&flow),
        BuildError::InvalidEntryPoint(name) if name == "start"
    ));
}

/// **Scenario**: A node naming an unregistered component is UnknownComponent with no compile cause.
#[test]
fn unregistered_component_is_unknown() {
    let mut flow = sentiment_flow();
    flow.nodes[1].component = "respond_enthusiastically".into();
    match build_err(&flow) {
        BuildError::UnknownComponent(unresolved) => {
            assert_eq!(unresolved.name, "respond_enthusiastically");
            assert!(unresolved.compile_error.is_none());
        }
        other => panic!("expected UnknownComponent, got {:?}", other),
    }
}

#[test]
fn router_component_as_node_is_rejected() {
    let mut flow = sentiment_flow();
    flow.nodes[2].component = "route_sentiment".into();
    assert!(matches!(
        build_err(&flow),
        BuildError::ComponentKindMismatch { component, .. } if component == "route_sentiment"
    ));
}
