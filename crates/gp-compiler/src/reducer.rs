use gp_core::psl::{Reduction, SuffixSet};

/// Collapse each hostname against the suffix table, preserving input order.
///
/// Hostnames whose rightmost label is not a known suffix are dropped.
pub fn reduce_domains<S>(hosts: &[S], suffixes: &SuffixSet, reduction: Reduction) -> Vec<String>
where
    S: AsRef<str>,
{
    let mut reduced = Vec::with_capacity(hosts.len());
    let mut dropped = 0usize;

    for host in hosts {
        let host = host.as_ref();
        match suffixes.reduce_host(host, reduction) {
            Some(domain) => reduced.push(domain.to_string()),
            None => {
                dropped += 1;
                log::debug!("dropping '{host}': no known public suffix");
            }
        }
    }

    log::info!("reduced {} hostnames to {} domains ({} dropped)", hosts.len(), reduced.len(), dropped);
    reduced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_in_input_order() {
        let suffixes = SuffixSet::from_iter(["uk", "co.uk", "com"]);
        let hosts = ["www.example.co.uk", "nowhere.test", "a.example.com", "www.example.co.uk"];

        assert_eq!(
            reduce_domains(&hosts, &suffixes, Reduction::SuffixChain),
            vec!["co.uk", "com", "co.uk"]
        );
        assert_eq!(
            reduce_domains(&hosts, &suffixes, Reduction::Registrable),
            vec!["example.co.uk", "example.com", "example.co.uk"]
        );
    }

    #[test]
    fn reduces_host_with_leading_dot() {
        let suffixes = SuffixSet::from_iter(["com"]);
        let hosts = [".example.com"];

        assert_eq!(reduce_domains(&hosts, &suffixes, Reduction::SuffixChain), vec!["com"]);
        assert_eq!(reduce_domains(&hosts, &suffixes, Reduction::Registrable), vec!["example.com"]);
    }

    #[test]
    fn empty_suffix_table_drops_everything() {
        let hosts = vec!["example.com".to_string()];
        assert!(reduce_domains(&hosts, &SuffixSet::new(), Reduction::Registrable).is_empty());
    }
}
