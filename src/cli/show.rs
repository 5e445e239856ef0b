use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::DeviceArgs,
    entity::{Entities, PollState},
    prelude::*,
    state::StateFile,
    tables::build_entities_table,
};

#[derive(Parser)]
pub struct ShowArgs {
    /// Read the battery energy totals from this state file, it is never written.
    #[clap(long, env = "STATE_FILE")]
    state_file: Option<PathBuf>,

    #[clap(long, env = "INSTANCE_ID", default_value = "jullix")]
    instance_id: String,

    #[clap(long)]
    include_disabled: bool,
}

impl ShowArgs {
    pub async fn run(self, device: &DeviceArgs) -> Result {
        let snapshot = device.new_client()?.fetch_all().await?;
        let mut entities = Entities::new(&snapshot, &self.instance_id);
        if let Some(path) = &self.state_file {
            entities.restore(&StateFile::load(path)?);
        }
        let poll = PollState { snapshot: &snapshot, last_update_success: true };
        println!("{}", build_entities_table(&entities.states(poll, self.include_disabled)));
        Ok(())
    }
}
