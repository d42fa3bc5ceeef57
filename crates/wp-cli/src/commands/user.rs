use wp_db::repos::users::NewUser;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `waypoint user`.
pub async fn handle(action: &UserCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        UserCommands::Register {
            name,
            email,
            class_level,
            age,
        } => {
            let user = ctx
                .service
                .register_user(&NewUser {
                    name: name.clone(),
                    email: email.clone(),
                    class_level: class_level.clone(),
                    age: *age,
                })
                .await?;
            output(&user, flags.format)
        }
        UserCommands::Get { id } => output(&ctx.service.get_user(id).await?, flags.format),
    }
}
