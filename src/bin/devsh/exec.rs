use clap::Args;

use devsh::dispatch::Action;

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Extension command to run, followed by its arguments
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<String>,
}

impl From<ExecArgs> for Action {
    fn from(args: ExecArgs) -> Self {
        Action::Exec(args.args)
    }
}
