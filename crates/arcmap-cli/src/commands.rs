use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info_span;

use arcmap_ingest::NormalizeOptions;
use arcmap_map::{MappingEngine, MatchOptions, MatchSummary, ModelCache, StrategyKind};
use arcmap_model::ResponseParser;

use arcmap_cli::workflow::{
    load_arc, load_dictionary, merge_resources, parse_resource_arg, read_candidates,
    resolve_model, write_candidates, write_responses, write_text,
};

use crate::cli::{MapArgs, MergeArgs, ModelArg, ResponsesArgs};
use crate::summary::{print_match_summary, print_response_summary};

pub fn run_map(args: &MapArgs) -> Result<()> {
    let _span = info_span!("map", source = %args.source.display()).entered();
    let kind: StrategyKind = args.strategy.parse()?;
    let options = MatchOptions::default()
        .with_num_matches(args.num_matches)
        .with_threshold(args.threshold)
        .with_model(model_name(&args.model));
    options.validate()?;

    let source = load_dictionary(&args.source, &normalize_options(args)?)?;
    let arc = load_arc(&args.arc, args.preset.as_deref())?;

    let engine = MappingEngine::new(Arc::new(ModelCache::default()), options);
    let rows = engine
        .suggest(kind, &source, &arc)
        .with_context(|| format!("run {kind} strategy"))?;

    let output = args.output.output.as_deref();
    write_candidates(&rows, args.output.format.into(), output)?;
    print_match_summary(kind, &MatchSummary::new(&source, &rows), &rows, output.is_none());
    Ok(())
}

pub fn run_responses(args: &ResponsesArgs) -> Result<()> {
    let _span = info_span!("responses", mapping = %args.mapping.display()).entered();
    let mut table = read_candidates(&args.mapping)?;
    if args.accepted_only {
        table = arcmap_map::accepted_matches(&table);
    }
    let engine = engine_for(&args.model);
    let rows = engine
        .infer_response_mapping(&table)
        .context("infer response mapping")?;

    let output = args.output.output.as_deref();
    write_responses(&rows, args.output.format.into(), output)?;
    print_response_summary(&rows, output.is_none());
    Ok(())
}

pub fn run_merge(args: &MergeArgs) -> Result<()> {
    let _span = info_span!("merge", mapping = %args.mapping.display()).entered();
    let resources = args
        .resources
        .iter()
        .map(|value| parse_resource_arg(value))
        .collect::<Result<Vec<_>>>()?;
    let table = read_candidates(&args.mapping)?;
    let columns: Vec<&str> = args.columns.iter().map(String::as_str).collect();
    let columns = (!columns.is_empty()).then_some(columns.as_slice());

    let text = merge_resources(&engine_for(&args.model), &table, &resources, columns)?;
    write_text(&text, args.output.as_deref())
}

fn engine_for(model: &ModelArg) -> MappingEngine {
    MappingEngine::new(
        Arc::new(ModelCache::default()),
        MatchOptions::default().with_model(model_name(model)),
    )
}

fn model_name(model: &ModelArg) -> String {
    resolve_model(model.model.as_deref())
}

fn normalize_options(args: &MapArgs) -> Result<NormalizeOptions> {
    let response_parser = args
        .response_parser
        .as_deref()
        .map(str::parse::<ResponseParser>)
        .transpose()?;
    Ok(NormalizeOptions {
        variable_field: args.variable_field.clone(),
        description_field: args.description_field.clone(),
        type_field: args.type_field.clone(),
        response_field: args.response_field.clone(),
        response_parser,
    })
}
