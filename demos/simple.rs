use flowplan::{Successor, WorkflowGraph, compile, validate};

fn main() {
    let text = include_str!("./workflow.json");

    let graph = WorkflowGraph::from_json(text).unwrap();
    validate(&graph).unwrap();

    let plan = compile(&graph);
    println!("entry: {}", plan.entry.as_deref().unwrap_or("(none)"));

    for item in &plan.items {
        match &item.next {
            Successor::None => println!("{} -> (end)", item.id),
            Successor::Single(target) => println!("{} -> {}", item.id, target),
            Successor::FanOut(targets) => println!("{} -> {}", item.id, targets.join(", ")),
            Successor::Branch { if_target, else_target } => {
                println!(
                    "{} -> if: {}, else: {}",
                    item.id,
                    if_target.as_deref().unwrap_or("(none)"),
                    else_target.as_deref().unwrap_or("(none)")
                );
            }
        }
    }

    println!("{}", plan.to_json().unwrap());
}
