//! Logic expression subcommands

use super::{open_store, print_json, read_tree, CliResult, TreeArgs, TreeCommand};
use reqmodel_core::model::Expression;
use reqmodel_engine::{
    apply_engine_command, apply_engine_query, EngineCommand, EngineCommandResult, EngineQuery,
    EngineQueryResult,
};

pub fn execute(args: TreeArgs) -> CliResult {
    match args.command {
        TreeCommand::Put(put) => {
            let expression: Expression = read_tree(&put.file)?;
            let mut conn = open_store(&put.owner.target.db)?;
            let cmd = EngineCommand::SaveExpression {
                model_key: put.owner.target.model,
                owner_key: put.owner.owner,
                expression,
            };
            if let EngineCommandResult::Saved {
                owner_key,
                row_count,
            } = apply_engine_command(cmd, &mut conn)?
            {
                println!("Saved {} ({} rows)", owner_key, row_count);
            }
        }
        TreeCommand::Get(get) => {
            let conn = open_store(&get.target.db)?;
            let query = EngineQuery::GetExpression {
                model_key: get.target.model,
                owner_key: get.owner,
            };
            if let EngineQueryResult::Expression(expr) = apply_engine_query(query, &conn)? {
                print_json(&expr)?;
            }
        }
        TreeCommand::List(list) => {
            let conn = open_store(&list.db)?;
            let query = EngineQuery::ListExpressions {
                model_key: list.model,
            };
            if let EngineQueryResult::Expressions(owners) = apply_engine_query(query, &conn)? {
                for (owner_key, outcome) in owners {
                    match outcome {
                        Ok(_) => println!("{}\tok", owner_key),
                        Err(e) => println!("{}\t{}", owner_key, e.code()),
                    }
                }
            }
        }
        TreeCommand::Delete(delete) => {
            let mut conn = open_store(&delete.target.db)?;
            let cmd = EngineCommand::DeleteExpression {
                model_key: delete.target.model,
                owner_key: delete.owner,
            };
            if let EngineCommandResult::Deleted {
                owner_key,
                row_count,
            } = apply_engine_command(cmd, &mut conn)?
            {
                println!("Deleted {} ({} rows)", owner_key, row_count);
            }
        }
    }
    Ok(())
}
