//! Typewire CLI - Type-directed Pipeline Composition
//!
//! This is a demonstration CLI for the typewire library: it assembles a
//! small request-handling pipeline and lets you inspect or invoke it.

use typewire::prelude::*;

#[derive(Debug, Clone, Default)]
struct Request {
    body: String,
}

#[derive(Debug, Clone, Default)]
struct RequestContext {
    authenticated: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct User {
    id: u32,
    name: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct UpdateUserArg {
    name: String,
}

fn main() {
    env_logger::init();

    println!(
        "typewire - type-directed pipeline composition v{}",
        typewire::VERSION
    );
    println!();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return;
    }

    match args[1].as_str() {
        "plan" => print_plan(),
        "run" => {
            let bodies: Vec<&str> = if args.len() > 2 {
                args[2..].iter().map(|s| s.as_str()).collect()
            } else {
                vec!["name=ada", "garbage"]
            };
            run(&bodies);
        }
        "help" | "--help" | "-h" => print_usage(&args[0]),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(&args[0]);
        }
    }
}

fn print_usage(program: &str) {
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  plan              Print the demo pipeline as JSON");
    println!("  run [body...]     Invoke the demo pipeline with request bodies");
    println!("  help              Show this help message");
    println!();
    println!("The demo pipeline updates a user from a body of the form name=<value>;");
    println!("any other body makes the decode step fail and short-circuit the run.");
}

fn build_handler() -> Callable<(Request,), (User,)> {
    PipelineBuilder::new()
        .step_named("context", |_req: Request| {
            (RequestContext {
                authenticated: true,
            },)
        })
        .deferred_named("respond", |user: User, fault: Fault| {
            if fault.is_set() {
                println!("  -> error: {fault}");
            } else {
                println!("  -> ok: {} #{}", user.name, user.id);
            }
        })
        .step_named("auth", |ctx: RequestContext| {
            if ctx.authenticated {
                (
                    User {
                        id: 1,
                        name: "anonymous".to_string(),
                    },
                    Fault::none(),
                )
            } else {
                (User::default(), Fault::message("unauthenticated"))
            }
        })
        .step_named("decode", |req: Request| {
            match req.body.strip_prefix("name=") {
                Some(name) if !name.is_empty() => (
                    UpdateUserArg {
                        name: name.to_string(),
                    },
                    Fault::none(),
                ),
                _ => (
                    UpdateUserArg::default(),
                    Fault::message("bad request: expected name=<value>"),
                ),
            }
        })
        .step_named("update", |user: User, arg: UpdateUserArg| {
            (
                User {
                    id: user.id,
                    name: arg.name,
                },
                Fault::none(),
            )
        })
        .compile::<(Request,), (User,)>()
        .expect("demo pipeline wiring is valid")
}

fn print_plan() {
    let handler = build_handler();
    match handler.pipeline().plan().to_json() {
        Ok(json) => println!("{json}"),
        Err(error) => eprintln!("Error: failed to serialize plan: {error}"),
    }
}

fn run(bodies: &[&str]) {
    let handler = build_handler();

    for body in bodies {
        println!("request body: {body:?}");
        let ((user,), stats) = handler.call_traced((Request {
            body: body.to_string(),
        },));

        println!(
            "  steps: {} ordinary, {} deferred{}",
            stats.steps_executed,
            stats.deferred_executed,
            match stats.short_circuited_at {
                Some(index) => format!(", short-circuited at step {index}"),
                None => String::new(),
            }
        );
        println!("  returned user: {} #{}", user.name, user.id);
        println!();
    }
}
