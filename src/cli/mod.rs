mod commands;
mod handlers;

pub use commands::{AddCommand, AddEntity, Cli, Commands};
pub use handlers::{
    handle_add_choice, handle_add_question, handle_delete, handle_delete_choice, handle_get,
    handle_init, handle_list, handle_results, handle_search, handle_serve, handle_update,
    handle_update_choice, handle_vote,
};
