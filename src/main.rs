use clap::Parser;
use pollbox::cli::{
    handle_add_choice, handle_add_question, handle_delete, handle_delete_choice, handle_get,
    handle_init, handle_list, handle_results, handle_search, handle_serve, handle_update,
    handle_update_choice, handle_vote, AddEntity, Cli, Commands,
};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Add(add) => match add.entity {
            AddEntity::Question {
                text,
                pub_date,
                json,
            } => handle_add_question(text, pub_date, json),
            AddEntity::Choice {
                text,
                question,
                json,
            } => handle_add_choice(text, question, json),
        },
        Commands::List { published, json } => handle_list(published, json),
        Commands::Get { id, json } => handle_get(id, json),
        Commands::Update {
            id,
            text,
            pub_date,
            json,
        } => handle_update(id, text, pub_date, json),
        Commands::Delete { id, force } => handle_delete(id, force),
        Commands::UpdateChoice { id, text, json } => handle_update_choice(id, text, json),
        Commands::DeleteChoice { id, force } => handle_delete_choice(id, force),
        Commands::Vote {
            question,
            choice,
            json,
        } => handle_vote(question, choice, json),
        Commands::Results { id, json } => handle_results(id, json),
        Commands::Search { query, json } => handle_search(query, json),
        Commands::Serve { bind } => handle_serve(bind),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
