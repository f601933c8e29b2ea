use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DataEnum, DeriveInput, Fields, parse_macro_input};

/// 收集变体上的全部`///`文档行，保留原始缩进。
fn extract_doc(attrs: &[syn::Attribute]) -> Vec<String> {
    let mut lines = Vec::new();
    for attr in attrs {
        if attr.path().is_ident("doc") {
            if let syn::Meta::NameValue(nv) = &attr.meta {
                if let syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(s), .. }) = &nv.value {
                    lines.push(s.value());
                }
            }
        }
    }
    lines
}

/// 从文档行中提取命令名。
///
/// 只识别未额外缩进的行，行首为`:cmd`或`[!]cmd`形式，例如：
///  - ` :peek       打印每个值` => `:peek`
///  - ` :sort[ num]` => `:sort`
///  - ` [!]len <len>` => `len`
fn extract_cmd(line: &str) -> Option<String> {
    let line = line.strip_prefix(' ').unwrap_or(line);
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = match line.strip_prefix("[!]") {
        Some(rest) => rest,
        None if line.starts_with(':') => line,
        None => return None,
    };
    let name: String = rest.chars().take_while(|c| !c.is_whitespace() && *c != '[').collect();
    if name.is_empty() || name == ":" { None } else { Some(name) }
}

#[proc_macro_derive(CmdHelp)]
pub fn cmd_help_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let enum_name = &input.ident;

    let Data::Enum(DataEnum { variants, .. }) = &input.data else {
        panic!("CmdHelp can only be derived on enums");
    };

    // help(&self)：当前变体的帮助信息
    let help_entries = variants.iter().map(|v| {
        let variant_name = &v.ident;
        let doc = extract_doc(&v.attrs).join("\n");
        let pattern = match &v.fields {
            Fields::Unit => quote! { #variant_name },
            Fields::Unnamed(_) => quote! { #variant_name(..) },
            Fields::Named(_) => quote! { #variant_name { .. } },
        };
        quote! {
            Self::#pattern => #doc,
        }
    });

    // all_help()：[(变体名, 帮助信息), ...]
    let all_help_entries = variants.iter().map(|v| {
        let name = v.ident.to_string();
        let doc = extract_doc(&v.attrs).join("\n");
        quote! {
            (#name, #doc)
        }
    });

    // cmds()：文档中声明的全部命令名，按声明顺序
    let mut cmds: Vec<String> = Vec::new();
    for cmd in variants.iter().flat_map(|v| extract_doc(&v.attrs)).filter_map(|line| extract_cmd(&line)) {
        if !cmds.contains(&cmd) {
            cmds.push(cmd);
        }
    }

    let expanded = quote! {
        impl #enum_name {
            /// 获取帮助信息。
            pub fn help(&self) -> &'static str {
                match self {
                    #(#help_entries)*
                }
            }

            /// 获取全部帮助信息：[(name, help), ...]
            pub fn all_help() -> &'static [(&'static str, &'static str)] {
                &[
                    #(#all_help_entries),*
                ]
            }

            /// 获取全部命令名。
            pub fn cmds() -> &'static [&'static str] {
                &[
                    #(#cmds),*
                ]
            }
        }
    };

    TokenStream::from(expanded)
}
