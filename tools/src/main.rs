use env_logger::Env;
use log::{LevelFilter, debug};
use numerica::{Config, Endpoint, Response};
use std::io::Read;

const USAGE: &str = "usage: numcalc [-v] [<endpoint> [<json body>]]

With an endpoint the request is answered once; the body is read from stdin
when left out. Without arguments an interactive prompt reads lines of the
form `<endpoint> <json body>`.";

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn print_response(resp: &Response) {
    match serde_json::to_string_pretty(&resp.body) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("cannot render response: {}", e),
    }
}

fn print_help() {
    println!("{}\n\nendpoints:", USAGE);
    for endpoint in Endpoint::ALL {
        println!("  {}", endpoint);
    }
    println!("\nexample:\n  bisection {{\"function\": \"x**3 - x - 2\", \"a\": 1, \"b\": 2}}");
}

fn one_shot(endpoint: &str, body: Option<String>, cfg: &Config) -> Result<(), String> {
    let body = match body {
        Some(body) => body,
        None => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body).map_err(|e| e.to_string())?;
            body
        }
    };
    let resp = numerica::handle(endpoint, &body, cfg);
    print_response(&resp);
    if resp.is_ok() {
        Ok(())
    } else {
        Err(format!("request failed with status {}", resp.status))
    }
}

fn repl(cfg: &Config) -> Result<(), String> {
    use rustyline::error::ReadlineError;
    let mut rl = rustyline::DefaultEditor::new().map_err(|e| e.to_string())?;
    loop {
        match rl.readline("~> ") {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(format!("Readline err: {:?}", e)),
            Ok(line) => {
                let line = line.trim();
                let (endpoint, body) = match line.split_once(char::is_whitespace) {
                    Some((endpoint, body)) => (endpoint, body.trim()),
                    None => (line, "{}"),
                };
                match endpoint {
                    "" => continue,
                    "quit" | "exit" => return Ok(()),
                    "help" => print_help(),
                    "config" => match serde_json::to_string_pretty(cfg) {
                        Ok(text) => println!("{}", text),
                        Err(e) => println!("Config err: {}", e),
                    },
                    _ => print_response(&numerica::handle(endpoint, body, cfg)),
                }
                let _ = rl.add_history_entry(line);
            }
        }
    }
}

fn main() -> Result<(), String> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.first().is_some_and(|a| a == "-v" || a == "--verbose");
    if verbose {
        args.remove(0);
    }
    init_logging(verbose);

    if args.first().is_some_and(|a| a == "-h" || a == "--help") {
        print_help();
        return Ok(());
    }

    let cfg = Config::load().map_err(|e| e.to_string())?;
    debug!("config: {:?}", cfg);

    match args.split_first() {
        Some((endpoint, rest)) if !rest.is_empty() => one_shot(endpoint, Some(rest.join(" ")), &cfg),
        Some((endpoint, _)) => one_shot(endpoint, None, &cfg),
        None => repl(&cfg),
    }
}
