use crate::args::ServiceArgs;
use crate::util::wsrpc_crate;

use generator::emit::{self, EmitCtx};
use generator::parse::service_from_trait;

use proc_macro2::TokenStream;
use syn::{Error, ItemTrait, Result};

pub(crate) fn expand(args: ServiceArgs, item: ItemTrait) -> Result<TokenStream> {
	let service = service_from_trait(args.role, &item)?;

	let ctx = EmitCtx::new(wsrpc_crate()?).with_vis(item.vis.clone());

	emit::service_items(&ctx, &service)
		.map_err(|e| Error::new_spanned(&item.ident, e))
}
